//! FASTQ input using noodles. Only names and sequences are kept.

use std::io::BufRead;
use std::path::Path;

use noodles::fastq;

use crate::parsing::{open_input, uncompressed_name, ParseError, SequenceRecord};

/// Check if the path has a FASTQ extension, compressed or not
pub fn is_fastq_file(path: &Path) -> bool {
    let name = uncompressed_name(path);
    name.ends_with(".fq") || name.ends_with(".fastq")
}

/// Read every record of a FASTQ file
///
/// # Errors
///
/// Returns `ParseError::Open` if the file cannot be opened and
/// `ParseError::Noodles` if a record is malformed.
pub fn read_fastq_file(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut reader = fastq::io::Reader::new(open_input(path)?);
    read_fastq_records(&mut reader)
}

/// Read every record from a noodles FASTQ reader
///
/// # Errors
///
/// Returns `ParseError::Noodles` if a record is malformed.
pub fn read_fastq_records<R: BufRead>(
    reader: &mut fastq::io::Reader<R>,
) -> Result<Vec<SequenceRecord>, ParseError> {
    reader
        .records()
        .map(|result| {
            let record = result
                .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;
            Ok(SequenceRecord {
                name: String::from_utf8_lossy(record.name()).to_string(),
                description: None,
                sequence: record.sequence().to_vec(),
            })
        })
        .collect()
}
