use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, BINARY};
use scrubber::{load_config, OsFilesystem, RunReport, Scrubber, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Delete or zip old and oversized files in configured directories",
    long_about = None
)]
struct Args {
    /// Path to the config file
    #[arg(long, short, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print out actions that would be executed but do nothing
    #[arg(long, short, visible_alias = "dry-run")]
    pretend: bool,

    /// Show more log output (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize logging. RUST_LOG takes precedence over the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .init();
}

fn print_summary(report: &RunReport, pretend: bool) {
    if report.directories.is_empty() {
        println!("No directories processed.");
        return;
    }

    for dir in &report.directories {
        println!("{}", format!("Directory: {}", dir.path.display()).bold());
        println!(
            "  {} candidates, {} processed ({})",
            dir.candidates,
            dir.processed,
            format_size(dir.processed_bytes, BINARY)
        );
    }

    println!("========================================");
    if pretend {
        println!("Pretend mode: no files were changed.");
    } else {
        println!(
            "Total Files Processed: {}",
            report.total_processed().to_string().bold()
        );
        println!(
            "Total Size Processed: {}",
            format_size(report.total_processed_bytes(), BINARY)
                .bold()
                .green()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("Arguments: {:?}", args);

    info!("Loading configuration file {}", args.config.display());
    let config = load_config(&args.config).context("Could not load config file")?;
    if let Some(title) = &config.title {
        info!("Configuration: {}", title);
    }

    info!("Beginning to scrub...");
    let scrubber = Scrubber::new(config, OsFilesystem, args.pretend);
    let report = match scrubber.run() {
        Ok(report) => report,
        Err(err) if err.is_limit_error() => {
            return Err(err).with_context(|| {
                format!("Invalid strategy limit in {}", args.config.display())
            });
        }
        Err(err) => return Err(err).context("Error while scrubbing files"),
    };

    print_summary(&report, scrubber.is_pretend());

    Ok(())
}
