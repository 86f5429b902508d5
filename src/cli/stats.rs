use std::path::PathBuf;

use clap::Args;

use crate::assembly::summary::AssemblyStats;
use crate::cli::OutputFormat;
use crate::parsing::fasta::read_fasta_file;

#[derive(Args)]
pub struct StatsArgs {
    /// FASTA file to summarize (optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute stats subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let records = read_fasta_file(&args.input)?;
    let stats = AssemblyStats::from_lengths(records.iter().map(|r| r.sequence.len()));

    match format {
        OutputFormat::Text => {
            println!("File:          {}", args.input.display());
            println!("Contigs:       {}", stats.contigs);
            println!("Total length:  {}", stats.total_length);
            println!("Longest:       {}", stats.longest);
            println!("N50:           {}", stats.n50);
            if verbose {
                for record in &records {
                    println!("  {}\t{}", record.name, record.sequence.len());
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Tsv => {
            println!("file\tcontigs\ttotal_length\tlongest\tn50");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                args.input.display(),
                stats.contigs,
                stats.total_length,
                stats.longest,
                stats.n50
            );
        }
    }

    Ok(())
}
