//! Contig extension and fusion.
//!
//! - [`config`]: tunables, sweep lists and run controls
//! - [`queue`] and [`pool`]: the per-round worker pool
//! - [`engine`]: the run manager driving rounds and fusion
//! - [`fusion`]: merging of overlapping contigs
//! - [`pipeline`]: parameter sweeps over a shared read set

pub mod collection;
pub mod config;
pub mod engine;
pub mod fusion;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod queue;
pub mod summary;
