//! Core data types for contig extension.
//!
//! - [`Read`](read::Read) and [`AlignedRead`](read::AlignedRead): a read in one
//!   orientation, and a read placed against a contig
//! - [`ReadStore`](read_store::ReadStore): all reads, sorted for prefix lookup
//! - [`Contig`](contig::Contig): a seed sequence and the extension logic
//!   that grows it
//!
//! Sequences are plain uppercase bytes over `ACGTN`.

pub mod contig;
pub mod read;
pub mod read_store;
pub mod types;
