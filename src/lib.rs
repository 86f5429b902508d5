//! # afin
//!
//! A library for extending seed contigs using a set of reads.
//!
//! Short-read assemblers often stop at repeats or coverage dips, leaving a
//! genome in many contigs. `afin` grows each contig outward from both ends
//! with the consensus of reads overlapping that end, then fuses contigs whose
//! ends come to overlap.
//!
//! ## Features
//!
//! - **Prefix-indexed reads**: Reads are kept sorted in both orientations so
//!   candidates for a contig end are found by binary search
//! - **Consensus extension**: Bases are added only with enough coverage and
//!   agreement among reads
//! - **Parallel rounds**: Contigs are extended concurrently by a worker pool
//! - **Fusion**: Overlapping contigs, in either orientation, are merged
//! - **Parameter sweeps**: Every tunable takes a list of values to try
//!
//! ## Example
//!
//! ```rust,no_run
//! use afin::assembly::config::{RunConfig, SweepOptions};
//! use afin::assembly::pipeline::Pipeline;
//! use std::path::PathBuf;
//!
//! let pipeline = Pipeline::new(
//!     SweepOptions::default(),
//!     RunConfig::default(),
//!     vec![PathBuf::from("reads.fq.gz")],
//!     vec![PathBuf::from("contigs.fa")],
//! )
//! .unwrap();
//!
//! for summary in pipeline.run().unwrap() {
//!     println!("{}: N50 {}", summary.output.display(), summary.stats.n50);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`assembly`]: Worker pool, run manager, fusion and sweeps
//! - [`core`]: Reads, the read store and contigs
//! - [`parsing`]: FASTA and FASTQ input
//! - [`cli`]: Command-line interface implementation

pub mod assembly;
pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::assembly::collection::ContigCollection;
pub use crate::assembly::config::{ExtensionParams, RunConfig, SweepOptions};
pub use crate::assembly::pipeline::Pipeline;
pub use crate::core::contig::Contig;
pub use crate::core::read_store::ReadStore;
pub use crate::core::types::*;
