use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::read_store::ReadStore;
use crate::parsing::fasta::{is_fasta_file, read_fasta_file};
use crate::parsing::fastq::{is_fastq_file, read_fastq_file};
use crate::parsing::ParseError;
use crate::utils::validation::{normalize_sequence, validate_sequence, ValidationError};

/// Import reads from FASTA and FASTQ files into a [`ReadStore`]
///
/// The format is chosen by extension. Empty records are skipped and read
/// sequences are normalized the same way contigs are.
///
/// # Errors
///
/// Returns `ParseError::UnsupportedFormat` for an unrecognized extension, or
/// any error from reading the files. A read with non-nucleotide symbols is
/// rejected with `ParseError::InvalidSequence`.
pub fn load_reads(paths: &[PathBuf]) -> Result<ReadStore, ParseError> {
    let mut sequences = Vec::new();

    for path in paths {
        let records = if is_fastq_file(path) {
            read_fastq_file(path)?
        } else if is_fasta_file(path) {
            read_fasta_file(path)?
        } else {
            return Err(ParseError::UnsupportedFormat(path.display().to_string()));
        };
        debug!(path = %path.display(), records = records.len(), "read reads file");

        for record in records {
            match validate_sequence(&record.sequence) {
                Ok(()) => sequences.push(normalize_sequence(&record.sequence)),
                Err(ValidationError::EmptySequence) => {}
                Err(source) => {
                    return Err(ParseError::InvalidSequence {
                        record: record.name,
                        source,
                    })
                }
            }
        }
    }

    let store = ReadStore::from_sequences(sequences);
    info!(reads = store.len(), files = paths.len(), "imported reads");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Orientation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::with_suffix(suffix).unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_load_mixed_formats() {
        let fq = temp_file(".fastq", b"@r1\nacgtt\n+\nIIIII\n");
        let fa = temp_file(".fa", b">r2\nGGCAT\n");

        let store = load_reads(&[fq.path().to_path_buf(), fa.path().to_path_buf()]).unwrap();
        assert_eq!(store.len(), 2);
        let forward: Vec<&[u8]> = store.iter(Orientation::Forward).collect();
        assert_eq!(forward, vec![&b"ACGTT"[..], &b"GGCAT"[..]]);
    }

    #[test]
    fn test_unsupported_extension() {
        let bam = temp_file(".bam", b"");
        let result = load_reads(&[bam.path().to_path_buf()]);
        assert!(matches!(result, Err(ParseError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_invalid_read_symbols() {
        let fa = temp_file(".fa", b">r1\nAC-GT\n");
        let result = load_reads(&[fa.path().to_path_buf()]);
        assert!(matches!(result, Err(ParseError::InvalidSequence { .. })));
    }
}
