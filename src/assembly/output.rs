//! FASTA output of assembled contigs.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use noodles::fasta;

use crate::assembly::collection::ContigCollection;
use crate::assembly::engine::AssemblyError;

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Final assembly path: `<prefix>.fa` for a single run, `<prefix>.<i>.fa`
/// when sweeping
pub fn final_path(prefix: &Path, iteration: usize, iterations: usize) -> PathBuf {
    if iterations > 1 {
        with_suffix(prefix, &format!(".{iteration}.fa"))
    } else {
        with_suffix(prefix, ".fa")
    }
}

/// Test-run snapshot path: `<prefix>.fus.fa` after initialization,
/// `<prefix>.fus<round>.fa` after each round
pub fn snapshot_path(prefix: &Path, round: Option<usize>) -> PathBuf {
    match round {
        Some(round) => with_suffix(prefix, &format!(".fus{round}.fa")),
        None => with_suffix(prefix, ".fus.fa"),
    }
}

/// Log file path: `<prefix>.log`
pub fn log_path(prefix: &Path) -> PathBuf {
    with_suffix(prefix, ".log")
}

/// Write every contig as one FASTA record
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_fasta<W: Write>(writer: W, contigs: &ContigCollection) -> io::Result<()> {
    let mut writer = fasta::io::Writer::new(writer);
    for contig in contigs.iter() {
        let definition = fasta::record::Definition::new(contig.name(), None);
        let sequence = fasta::record::Sequence::from(contig.sequence().to_vec());
        writer.write_record(&fasta::Record::new(definition, sequence))?;
    }
    Ok(())
}

/// Create `path` and write the collection to it
///
/// # Errors
///
/// Returns `AssemblyError::Output` if the file cannot be created or written.
pub fn write_contigs(path: &Path, contigs: &ContigCollection) -> Result<(), AssemblyError> {
    let to_error = |source| AssemblyError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_error)?;
    let mut buf = BufWriter::new(file);
    write_fasta(&mut buf, contigs).map_err(to_error)?;
    buf.flush().map_err(to_error)
}
