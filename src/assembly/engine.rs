use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::assembly::collection::ContigCollection;
use crate::assembly::config::{ConfigError, ExtensionParams, RunConfig};
use crate::assembly::fusion::FusionEngine;
use crate::assembly::output::{final_path, snapshot_path, write_contigs};
use crate::assembly::pool::{RoundReport, WorkerPool};
use crate::assembly::summary::{AssemblyStats, RunSummary};
use crate::core::read_store::ReadStore;
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Failed to spawn worker thread ({spawned} of {requested} running): {source}")]
    WorkerSpawn {
        requested: usize,
        spawned: usize,
        source: std::io::Error,
    },

    #[error("Worker thread {0} panicked")]
    WorkerPanicked(usize),

    #[error("Failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Where a [`RunManager`] is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    ExtendingRound(usize),
    Fusing,
    Finalizing,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initializing => write!(f, "initializing"),
            Self::ExtendingRound(round) => write!(f, "extending (round {})", round + 1),
            Self::Fusing => write!(f, "fusing"),
            Self::Finalizing => write!(f, "finalizing"),
        }
    }
}

/// Drives one sweep entry: pre-fusion, extension rounds, fusion, output
pub struct RunManager<'a> {
    reads: &'a ReadStore,
    params: &'a ExtensionParams,
    config: &'a RunConfig,
    pool: WorkerPool,
    phase: Phase,
}

impl<'a> RunManager<'a> {
    pub fn new(reads: &'a ReadStore, params: &'a ExtensionParams, config: &'a RunConfig) -> Self {
        Self {
            reads,
            params,
            config,
            pool: WorkerPool::new(config.max_threads),
            phase: Phase::Initializing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Run the whole extend/fuse cycle for sweep entry `iteration` and write
    /// the final assembly
    ///
    /// # Errors
    ///
    /// Returns an error if a worker cannot be spawned or panics, or an output
    /// file cannot be written.
    pub fn run(
        &mut self,
        contigs: &mut ContigCollection,
        iteration: usize,
    ) -> Result<RunSummary, AssemblyError> {
        self.enter(Phase::Initializing);
        let input_contigs = contigs.len();
        let input_length = contigs.total_length();
        let mut fused = 0;
        let mut bases_added = 0;

        if self.config.fusion {
            fused += FusionEngine::new(self.reads, self.params)
                .run(contigs)
                .removed();
        }

        let trimmed = self.trim(contigs)?;

        info!(
            contigs = contigs.len(),
            reads = self.reads.len(),
            "end initialization phase"
        );
        if self.config.test_run {
            write_contigs(&snapshot_path(&self.config.output_prefix, None), contigs)?;
        }

        for round in 0..self.params.max_search_loops {
            self.enter(Phase::ExtendingRound(round));
            let report = self.extend_round(contigs)?;
            bases_added += report.bases_added;
            info!(
                round = round + 1,
                contigs = report.jobs,
                bases_added = report.bases_added,
                "extension round complete"
            );

            if self.config.fusion {
                self.enter(Phase::Fusing);
                fused += FusionEngine::new(self.reads, self.params)
                    .run(contigs)
                    .removed();
            }

            if self.config.test_run {
                debug!(
                    contigs = contigs.len(),
                    max_threads = self.config.max_threads,
                    "round diagnostics"
                );
                write_contigs(
                    &snapshot_path(&self.config.output_prefix, Some(round)),
                    contigs,
                )?;
            }
        }

        self.enter(Phase::Finalizing);
        let output = final_path(
            &self.config.output_prefix,
            iteration,
            self.config.max_iterations,
        );
        write_contigs(&output, contigs)?;
        info!(output = %output.display(), contigs = contigs.len(), "wrote assembly");

        Ok(RunSummary {
            iteration,
            params: self.params.clone(),
            input_contigs,
            input_length,
            trimmed,
            fused,
            bases_added,
            stats: AssemblyStats::from_lengths(contigs.iter().map(|c| c.len())),
            output,
        })
    }

    /// One extension round: every contig extended on both ends by the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a worker cannot be spawned or panics.
    pub fn extend_round(
        &self,
        contigs: &mut ContigCollection,
    ) -> Result<RoundReport, AssemblyError> {
        let reads = self.reads;
        let params = self.params;
        self.pool.run_round(contigs.as_mut_slice(), |index, contig| {
            let added = contig.extend_both(reads, params);
            if added > 0 {
                debug!(index, contig = %contig.name(), added, "extended contig");
            }
            added
        })
    }

    /// Trim low-coverage ends when `initial_trim` is set, dropping contigs
    /// trimmed to nothing
    fn trim(&self, contigs: &mut ContigCollection) -> Result<usize, AssemblyError> {
        if self.params.initial_trim == 0 {
            return Ok(0);
        }
        let reads = self.reads;
        let params = self.params;
        let report = self
            .pool
            .run_round(contigs.as_mut_slice(), |_, contig| {
                contig.trim_low_coverage(reads, params)
            })?;
        let emptied = contigs.remove_empty();
        info!(
            trimmed = report.bases_added,
            removed = emptied,
            "initial trim complete"
        );
        Ok(report.bases_added)
    }
}
