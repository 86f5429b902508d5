use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use afin::assembly::output::log_path;
use afin::cli;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let (screen, log_file) = match &cli.command {
        cli::Commands::Extend(args) => (!args.quiet, (!args.no_log).then(|| log_path(&args.output))),
        cli::Commands::Stats(_) => (true, None),
    };
    init_logging(cli.verbose, screen, log_file);

    match cli.command {
        cli::Commands::Extend(args) => {
            cli::extend::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Stats(args) => {
            cli::stats::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}

/// Log to stderr unless `screen` is off, and to `log_file` if given
fn init_logging(verbose: bool, screen: bool, log_file: Option<PathBuf>) {
    let filter = if verbose {
        EnvFilter::new("afin=debug,info")
    } else {
        EnvFilter::new("afin=info,warn")
    };

    let screen_layer = screen.then(|| {
        fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
    });

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match File::create(&path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(e) => {
            open_error = Some((path, e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(screen_layer)
        .with(file_layer)
        .init();

    if let Some((path, e)) = open_error {
        warn!(path = %path.display(), error = %e, "could not open log file, logging to screen only");
    }
}
