//! FASTA input using noodles.
//!
//! Seed contigs are read from FASTA. A `cov=<n>` token in a record's
//! description overrides `min_cov` for that contig only, so contigs from
//! regions of known depth can be extended with a matching threshold.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna` (uncompressed)
//! - `.fa.gz`, `.fasta.gz`, `.fna.gz` (gzip compressed)
//! - `.fa.bgz`, `.fasta.bgz`, `.fna.bgz` (bgzip compressed)

use std::io::BufRead;
use std::path::{Path, PathBuf};

use noodles::fasta;
use tracing::{debug, info, warn};

use crate::assembly::collection::ContigCollection;
use crate::assembly::config::ExtensionParams;
use crate::core::contig::Contig;
use crate::parsing::{open_input, uncompressed_name, ParseError, SequenceRecord};
use crate::utils::validation::{validate_sequence, ValidationError};

/// Check if the path has a FASTA extension, compressed or not
pub fn is_fasta_file(path: &Path) -> bool {
    let name = uncompressed_name(path);
    [".fa", ".fasta", ".fna"]
        .iter()
        .any(|ext| name.ends_with(ext))
}

/// Read every record of a FASTA file
///
/// # Errors
///
/// Returns `ParseError::Open` if the file cannot be opened and
/// `ParseError::Noodles` if a record is malformed.
pub fn read_fasta_file(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut reader = fasta::io::Reader::new(open_input(path)?);
    read_fasta_records(&mut reader)
}

/// Read every record from a noodles FASTA reader
///
/// # Errors
///
/// Returns `ParseError::Noodles` if a record is malformed.
pub fn read_fasta_records<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        records.push(SequenceRecord {
            name: String::from_utf8_lossy(record.name()).to_string(),
            description: record
                .description()
                .map(|d| String::from_utf8_lossy(d).to_string()),
            sequence: record.sequence().as_ref().to_vec(),
        });
    }

    Ok(records)
}

/// Coverage override from a record description, e.g. `len=5000 cov=12`
pub fn coverage_hint(description: &str) -> Option<usize> {
    description
        .split_whitespace()
        .find_map(|token| token.strip_prefix("cov="))
        .and_then(|value| value.parse().ok())
        .filter(|&cov| cov > 0)
}

/// Build a seed contig from one FASTA record
///
/// Empty records yield `None` and are logged.
///
/// # Errors
///
/// Returns `ParseError::InvalidSequence` if the record holds non-nucleotide
/// symbols.
pub fn contig_from_record(
    record: SequenceRecord,
    params: &ExtensionParams,
) -> Result<Option<Contig>, ParseError> {
    match validate_sequence(&record.sequence) {
        Ok(()) => {}
        Err(ValidationError::EmptySequence) => {
            warn!(record = %record.name, "skipping empty contig");
            return Ok(None);
        }
        Err(source) => {
            return Err(ParseError::InvalidSequence {
                record: record.name,
                source,
            })
        }
    }

    let mut contig = Contig::new(record.name, &record.sequence, params);
    if let Some(cov) = record.description.as_deref().and_then(coverage_hint) {
        contig = contig.with_min_cov(cov);
    }
    Ok(Some(contig))
}

/// Load seed contigs from one or more FASTA files
///
/// # Errors
///
/// Returns a `ParseError` if a file cannot be read, a record holds
/// non-nucleotide symbols, or the files hold no non-empty sequences at all.
pub fn load_contigs(
    paths: &[PathBuf],
    params: &ExtensionParams,
) -> Result<ContigCollection, ParseError> {
    let mut contigs = Vec::new();

    for path in paths {
        let records = read_fasta_file(path)?;
        debug!(path = %path.display(), records = records.len(), "read contig file");

        for record in records {
            contigs.extend(contig_from_record(record, params)?);
        }
    }

    if contigs.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No sequences found in contig files".to_string(),
        ));
    }

    info!(contigs = contigs.len(), "loaded contigs");
    Ok(ContigCollection::new(contigs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fasta_file(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_is_fasta_file() {
        assert!(is_fasta_file(Path::new("test.fa")));
        assert!(is_fasta_file(Path::new("test.fasta")));
        assert!(is_fasta_file(Path::new("test.fna.bgz")));
        assert!(is_fasta_file(Path::new("/path/to/Contigs.FA.gz")));

        assert!(!is_fasta_file(Path::new("reads.fq")));
        assert!(!is_fasta_file(Path::new("reads.fastq.gz")));
        assert!(!is_fasta_file(Path::new("test.fai")));
    }

    #[test]
    fn test_read_fasta_file() {
        let temp = fasta_file(".fa", b">ctg1 cov=7\nACGTACGT\nACGT\n>ctg2\nGGGG\n");

        let records = read_fasta_file(temp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ctg1");
        assert_eq!(records[0].description.as_deref(), Some("cov=7"));
        assert_eq!(records[0].sequence, b"ACGTACGTACGT");
        assert_eq!(records[1].description, None);
    }

    #[test]
    fn test_read_gzipped_fasta() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">ctg1\nACGT\n").unwrap();
        let temp = fasta_file(".fa.gz", &encoder.finish().unwrap());

        let records = read_fasta_file(temp.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, b"ACGT");
    }

    #[test]
    fn test_coverage_hint() {
        assert_eq!(coverage_hint("cov=12"), Some(12));
        assert_eq!(coverage_hint("len=500 cov=4 circular"), Some(4));
        assert_eq!(coverage_hint("coverage=4"), None);
        assert_eq!(coverage_hint("cov=abc"), None);
        assert_eq!(coverage_hint("cov=0"), None);
    }

    #[test]
    fn test_load_contigs_applies_hint_and_normalizes() {
        let temp = fasta_file(".fa", b">a cov=9\nacgtRY\n>b\nACGT\n");
        let params = ExtensionParams::default();

        let contigs = load_contigs(&[temp.path().to_path_buf()], &params).unwrap();
        assert_eq!(contigs.len(), 2);
        let a = contigs.get(0).unwrap();
        assert_eq!(a.sequence(), b"ACGTNN");
        assert_eq!(a.min_cov(), 9);
        assert_eq!(contigs.get(1).unwrap().min_cov(), params.min_cov);
    }

    #[test]
    fn test_load_contigs_concatenates_files() {
        let first = fasta_file(".fa", b">a\nACGT\n");
        let second = fasta_file(".fasta", b">b\nTTTT\n>c\nGGGG\n");
        let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let contigs = load_contigs(&paths, &ExtensionParams::default()).unwrap();
        let names: Vec<&str> = contigs.iter().map(Contig::name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_load_contigs_rejects_bad_symbols() {
        let temp = fasta_file(".fa", b">bad\nACGT*ACGT\n");
        let err = load_contigs(&[temp.path().to_path_buf()], &ExtensionParams::default())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidSequence { ref record, .. } if record == "bad"));
    }

    #[test]
    fn test_empty_record_is_skipped() {
        let params = ExtensionParams::default();
        let empty = SequenceRecord {
            name: "gap".to_string(),
            description: Some("cov=5".to_string()),
            sequence: Vec::new(),
        };
        assert!(contig_from_record(empty, &params).unwrap().is_none());

        let record = SequenceRecord {
            name: "ctg".to_string(),
            description: Some("cov=5".to_string()),
            sequence: b"ACGT".to_vec(),
        };
        let contig = contig_from_record(record, &params).unwrap().unwrap();
        assert_eq!(contig.name(), "ctg");
        assert_eq!(contig.min_cov(), 5);
    }

    #[test]
    fn test_load_contigs_empty_file() {
        let temp = fasta_file(".fa", b"");
        let result = load_contigs(&[temp.path().to_path_buf()], &ExtensionParams::default());
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }
}
