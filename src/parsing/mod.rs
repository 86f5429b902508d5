//! Readers for contig and read input files.
//!
//! - **FASTA** (`.fa`, `.fasta`, `.fna`): seed contigs, or reads
//! - **FASTQ** (`.fq`, `.fastq`): reads; qualities are ignored
//!
//! Any of these may be gzip or bgzip compressed (`.gz`, `.bgz`). Several files
//! can be given for either input; their records are concatenated in order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use afin::assembly::config::ExtensionParams;
//! use afin::parsing::{fasta::load_contigs, reads::load_reads};
//! use std::path::PathBuf;
//!
//! let reads = load_reads(&[PathBuf::from("reads.fq.gz")]).unwrap();
//! let contigs = load_contigs(&[PathBuf::from("contigs.fa")], &ExtensionParams::default()).unwrap();
//! println!("{} reads, {} contigs", reads.len(), contigs.len());
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::utils::validation::ValidationError;

pub mod fasta;
pub mod fastq;
pub mod reads;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid sequence in record '{record}': {source}")]
    InvalidSequence {
        record: String,
        source: ValidationError,
    },
}

/// One named sequence read from an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub(crate) fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// File name with any compression extension removed, lowercased
pub(crate) fn uncompressed_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    name.strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".bgz"))
        .unwrap_or(&name)
        .to_string()
}

/// Open `path` for buffered reading, decompressing if needed
///
/// # Errors
///
/// Returns `ParseError::Open` if the file cannot be opened.
pub(crate) fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
