//! Sweep driver.
//!
//! Reads are imported once and shared by every sweep entry. Each entry
//! reloads the seed contigs with its own parameters and runs a fresh
//! [`RunManager`], so entries never see each other's output.

use std::path::PathBuf;

use tracing::info;

use crate::assembly::config::{ConfigError, ExtensionParams, RunConfig, SweepOptions};
use crate::assembly::engine::{AssemblyError, RunManager};
use crate::assembly::summary::RunSummary;
use crate::core::read_store::ReadStore;
use crate::parsing::fasta::load_contigs;
use crate::parsing::reads::load_reads;

pub struct Pipeline {
    sweep: SweepOptions,
    config: RunConfig,
    read_files: Vec<PathBuf>,
    contig_files: Vec<PathBuf>,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns a `ConfigError` if the run controls are invalid or either file
    /// list is empty.
    pub fn new(
        sweep: SweepOptions,
        config: RunConfig,
        read_files: Vec<PathBuf>,
        contig_files: Vec<PathBuf>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if read_files.is_empty() {
            return Err(ConfigError::EmptyList("reads".to_string()));
        }
        if contig_files.is_empty() {
            return Err(ConfigError::EmptyList("contigs".to_string()));
        }
        Ok(Self {
            sweep,
            config,
            read_files,
            contig_files,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Import reads and run every sweep entry in order
    ///
    /// # Errors
    ///
    /// Returns the first error from input parsing, a worker, or output.
    pub fn run(&self) -> Result<Vec<RunSummary>, AssemblyError> {
        let reads = load_reads(&self.read_files)?;
        self.run_with_reads(&reads)
    }

    /// Run every sweep entry against already imported reads
    ///
    /// # Errors
    ///
    /// Returns the first error from contig parsing, a worker, or output.
    pub fn run_with_reads(&self, reads: &ReadStore) -> Result<Vec<RunSummary>, AssemblyError> {
        let mut summaries = Vec::with_capacity(self.config.max_iterations);

        for iteration in 0..self.config.max_iterations {
            let params = self.sweep.params(iteration);
            log_options(iteration, &params, &self.config);

            let mut contigs = load_contigs(&self.contig_files, &params)?;
            let summary =
                RunManager::new(reads, &params, &self.config).run(&mut contigs, iteration)?;
            info!(
                iteration,
                contigs = summary.stats.contigs,
                total_length = summary.stats.total_length,
                n50 = summary.stats.n50,
                "sweep entry complete"
            );
            summaries.push(summary);
        }

        Ok(summaries)
    }
}

fn log_options(iteration: usize, params: &ExtensionParams, config: &RunConfig) {
    info!(
        iteration,
        max_search_loops = params.max_search_loops,
        contig_sub_len = params.contig_sub_len,
        extend_len = params.extend_len,
        max_sort_char = params.max_sort_char,
        min_cov = params.min_cov,
        min_overlap = params.min_overlap,
        initial_trim = params.initial_trim,
        max_missed = params.max_missed,
        stop_ext = params.stop_ext,
        mismatch_threshold = params.mismatch_threshold,
        max_threads = config.max_threads,
        fusion = config.fusion,
        test_run = config.test_run,
        "starting sweep entry"
    );
}
