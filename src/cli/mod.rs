//! Command-line interface for afin.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **extend**: Extend and fuse seed contigs using a read set
//! - **stats**: Report length statistics for a FASTA file
//!
//! ## Usage
//!
//! ```text
//! # Extend contigs with default settings
//! afin extend -r reads.fq.gz -c contigs.fa -o assembly
//!
//! # Sweep two loop counts and two coverage thresholds
//! afin extend -r reads_1.fq,reads_2.fq -c contigs.fa -i 2 \
//!     --max-search-loops 5,10 --min-cov 3,5
//!
//! # Summarize the result as JSON
//! afin stats assembly.fa --format json
//! ```

use clap::{Parser, Subcommand};

pub mod extend;
pub mod stats;

#[derive(Parser)]
#[command(name = "afin")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Extend and fuse contigs using a read set")]
#[command(
    long_about = "afin extends seed contigs outward from both ends with the consensus of overlapping reads, then fuses contigs whose ends overlap.\n\nExtension and fusion alternate for a fixed number of rounds. Every tunable accepts a comma-separated list so that several parameter sets can be run against the same reads in one invocation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extend and fuse contigs
    Extend(extend::ExtendArgs),

    /// Report contig length statistics
    Stats(stats::StatsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
