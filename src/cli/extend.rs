use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::error;

use crate::assembly::config::{RunConfig, SweepOptions};
use crate::assembly::pipeline::Pipeline;
use crate::assembly::summary::RunSummary;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct ExtendArgs {
    /// Read files (FASTA or FASTQ, optionally gzipped); comma-separated or repeated
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub reads: Vec<PathBuf>,

    /// Seed contig FASTA files; comma-separated or repeated
    #[arg(short, long, required = true, value_delimiter = ',')]
    pub contigs: Vec<PathBuf>,

    /// Prefix for output files
    #[arg(short, long, default_value = "afin_out")]
    pub output: PathBuf,

    /// Worker threads per extension round
    #[arg(short = 't', long, default_value = "4")]
    pub max_threads: usize,

    /// Number of parameter sweep entries to run
    #[arg(short = 'i', long, default_value = "1")]
    pub max_iterations: usize,

    /// Do not fuse contigs, before or after extension rounds
    #[arg(long)]
    pub no_fusion: bool,

    /// Write intermediate assemblies after every round
    #[arg(long)]
    pub test_run: bool,

    /// Do not log to the screen
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not write a log file
    #[arg(long)]
    pub no_log: bool,

    // === Sweepable options: comma-separated lists, one value per sweep entry ===
    /// Extension/fusion rounds (default 10)
    #[arg(short = 'l', long)]
    pub max_search_loops: Option<String>,

    /// Bases from each contig end used to find reads (default 100)
    #[arg(short = 's', long)]
    pub contig_sub_len: Option<String>,

    /// Maximum bases added to one end per round (default 40)
    #[arg(short = 'x', long)]
    pub extend_len: Option<String>,

    /// Prefix length used to find candidate reads (default 4)
    #[arg(long)]
    pub max_sort_char: Option<String>,

    /// Minimum reads covering an extended base (default 3)
    #[arg(long)]
    pub min_cov: Option<String>,

    /// Minimum read/contig and contig/contig overlap (default 20)
    #[arg(long)]
    pub min_overlap: Option<String>,

    /// Maximum low-coverage bases trimmed from each end before extending (default 0)
    #[arg(long)]
    pub initial_trim: Option<String>,

    /// Maximum mismatches between a read and the contig (default 5)
    #[arg(long)]
    pub max_missed: Option<String>,

    /// Minimum cumulative fraction of reads agreeing with an extension (default 0.5)
    #[arg(long)]
    pub stop_ext: Option<String>,

    /// Maximum fraction of reads disagreeing with a consensus base (default 0.1)
    #[arg(long)]
    pub mismatch_threshold: Option<String>,
}

impl ExtendArgs {
    /// Sweep lists given on the command line, by option name
    fn sweep_values(&self) -> [(&'static str, Option<&str>); 10] {
        [
            ("max_search_loops", self.max_search_loops.as_deref()),
            ("contig_sub_len", self.contig_sub_len.as_deref()),
            ("extend_len", self.extend_len.as_deref()),
            ("max_sort_char", self.max_sort_char.as_deref()),
            ("min_cov", self.min_cov.as_deref()),
            ("min_overlap", self.min_overlap.as_deref()),
            ("initial_trim", self.initial_trim.as_deref()),
            ("max_missed", self.max_missed.as_deref()),
            ("stop_ext", self.stop_ext.as_deref()),
            ("mismatch_threshold", self.mismatch_threshold.as_deref()),
        ]
    }

    /// # Errors
    ///
    /// Returns an error if any sweep list is malformed or out of range.
    pub fn sweep_options(&self) -> anyhow::Result<SweepOptions> {
        let mut sweep = SweepOptions::default();
        for (name, value) in self.sweep_values() {
            if let Some(value) = value {
                sweep.set(name, value)?;
            }
        }
        Ok(sweep)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            max_threads: self.max_threads,
            fusion: !self.no_fusion,
            test_run: self.test_run,
            max_iterations: self.max_iterations,
            output_prefix: self.output.clone(),
        }
    }
}

/// Execute extend subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be
/// parsed, or the assembly cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtendArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sweep = args.sweep_options().map_err(|e| {
        error!(%e, "invalid configuration");
        e
    })?;

    let pipeline = Pipeline::new(
        sweep,
        args.run_config(),
        args.reads.clone(),
        args.contigs.clone(),
    )
    .map_err(|e| {
        error!(%e, "invalid configuration");
        e
    })?;

    let summaries = pipeline.run().context("Assembly failed")?;

    match format {
        OutputFormat::Text => print_text_summaries(&summaries, verbose),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Tsv => print_tsv_summaries(&summaries),
    }

    Ok(())
}

fn print_text_summaries(summaries: &[RunSummary], verbose: bool) {
    for summary in summaries {
        println!("Sweep entry {}", summary.iteration);
        println!("  Output:        {}", summary.output.display());
        println!(
            "  Input:         {} contigs, {} bp",
            summary.input_contigs, summary.input_length
        );
        println!(
            "  Result:        {} contigs, {} bp (longest {}, N50 {})",
            summary.stats.contigs,
            summary.stats.total_length,
            summary.stats.longest,
            summary.stats.n50
        );
        println!("  Bases added:   {}", summary.bases_added);
        println!("  Fused:         {}", summary.fused);
        if summary.trimmed > 0 {
            println!("  Trimmed:       {} bp", summary.trimmed);
        }
        if verbose {
            let p = &summary.params;
            println!(
                "  Parameters:    loops={} sub_len={} extend_len={} sort_char={} min_cov={} min_overlap={} trim={} max_missed={} stop_ext={} mismatch={}",
                p.max_search_loops,
                p.contig_sub_len,
                p.extend_len,
                p.max_sort_char,
                p.min_cov,
                p.min_overlap,
                p.initial_trim,
                p.max_missed,
                p.stop_ext,
                p.mismatch_threshold
            );
        }
        println!();
    }
}

fn print_tsv_summaries(summaries: &[RunSummary]) {
    println!(
        "iteration\toutput\tinput_contigs\tinput_length\tcontigs\ttotal_length\tlongest\tn50\tbases_added\tfused\ttrimmed\tmax_search_loops\tcontig_sub_len\textend_len\tmax_sort_char\tmin_cov\tmin_overlap\tinitial_trim\tmax_missed\tstop_ext\tmismatch_threshold"
    );
    for s in summaries {
        let p = &s.params;
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.iteration,
            s.output.display(),
            s.input_contigs,
            s.input_length,
            s.stats.contigs,
            s.stats.total_length,
            s.stats.longest,
            s.stats.n50,
            s.bases_added,
            s.fused,
            s.trimmed,
            p.max_search_loops,
            p.contig_sub_len,
            p.extend_len,
            p.max_sort_char,
            p.min_cov,
            p.min_overlap,
            p.initial_trim,
            p.max_missed,
            p.stop_ext,
            p.mismatch_threshold
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> ExtendArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Extend(args) => args,
            Commands::Stats(_) => panic!("expected extend"),
        }
    }

    #[test]
    fn test_comma_separated_inputs() {
        let args = parse(&["afin", "extend", "-r", "a.fq,b.fq", "-c", "c.fa", "-r", "d.fa"]);
        assert_eq!(
            args.reads,
            vec![
                PathBuf::from("a.fq"),
                PathBuf::from("b.fq"),
                PathBuf::from("d.fa")
            ]
        );
        assert_eq!(args.contigs, vec![PathBuf::from("c.fa")]);
    }

    #[test]
    fn test_sweep_options_from_args() {
        let args = parse(&[
            "afin",
            "extend",
            "-r",
            "r.fq",
            "-c",
            "c.fa",
            "--max-search-loops",
            "5,10",
            "--stop-ext",
            "0.7",
        ]);
        let sweep = args.sweep_options().unwrap();
        assert_eq!(sweep.params(0).max_search_loops, 5);
        assert_eq!(sweep.params(2).max_search_loops, 10);
        assert!((sweep.params(1).stop_ext - 0.7).abs() < f64::EPSILON);
        assert_eq!(sweep.params(0).min_cov, 3);
    }

    #[test]
    fn test_run_config_from_args() {
        let args = parse(&[
            "afin", "extend", "-r", "r.fq", "-c", "c.fa", "--no-fusion", "-t", "8", "-o",
            "out/x",
        ]);
        let config = args.run_config();
        assert!(!config.fusion);
        assert_eq!(config.max_threads, 8);
        assert_eq!(config.output_prefix, PathBuf::from("out/x"));
    }

    #[test]
    fn test_malformed_sweep_list() {
        let args = parse(&["afin", "extend", "-r", "r.fq", "-c", "c.fa", "--min-cov", "3,x"]);
        assert!(args.sweep_options().is_err());
    }
}
