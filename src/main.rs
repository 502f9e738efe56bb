use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dupe_quarantine_rs::logging::init_logging;
use dupe_quarantine_rs::prelude::*;

#[derive(Parser)]
#[command(name = "dupe_quarantine_rs")]
#[command(about = "Find duplicate files and move them to a check folder", long_about = None)]
struct Cli {
    /// The starting directory for your scan
    root_directory: PathBuf,

    /// The path for where the CHECK files will go
    check_directory: PathBuf,

    /// The hash method to use (MD5 or SHA256)
    #[arg(long = "hash", default_value = "SHA256", value_parser = parse_hash)]
    hash: HashAlgorithm,

    /// Comma separated list of file extensions to check (e.g. 'jpg,jpeg,png'), or 'all'
    #[arg(long, default_value = "all", value_parser = parse_extensions)]
    extensions: ExtensionFilter,

    /// Name of the report file to be generated
    #[arg(long = "report-file", alias = "report_file", default_value = DEFAULT_REPORT_FILE)]
    report_file: PathBuf,

    /// Also scan the check directory when it lives inside the root directory
    #[arg(long)]
    include_quarantine: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Exit with status 3 when any file could not be read or moved
    #[arg(long)]
    strict: bool,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_hash(s: &str) -> Result<HashAlgorithm, String> {
    s.parse().map_err(|e: DedupError| e.to_string())
}

fn parse_extensions(s: &str) -> Result<ExtensionFilter, String> {
    s.parse().map_err(|e: DedupError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Set up graceful shutdown handler
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutdown requested. Finishing current file...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Error setting Ctrl-C handler")?;

    let config = RunConfig::new(&cli.root_directory, &cli.check_directory)
        .with_algorithm(cli.hash)
        .with_filter(cli.extensions.clone())
        .with_report_path(&cli.report_file)
        .with_exclude_quarantine(!cli.include_quarantine);
    config.validate().context("Invalid arguments")?;

    // Set up progress bar (skip in batch mode)
    let progress = if cli.batch || cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        pb.set_message("Scanning files");
        pb
    };

    let run = DedupRun::new(config).with_shutdown_flag(shutdown_requested.clone());
    let outcome = run.execute(&progress).context("Duplicate scan failed")?;
    progress.finish_and_clear();

    if !outcome.read_errors.is_empty() {
        eprintln!("Skipped {} unreadable file(s)", outcome.read_errors.len());
    }

    if let Some(ref summary_path) = cli.summary_json {
        write_summary(summary_path, &outcome)?;
    }

    if outcome.interrupted && outcome.report_path.is_none() {
        eprintln!("Interrupted after scanning {} file(s), nothing was moved", outcome.files_scanned);
        std::process::exit(130);
    }

    for line in summary_lines(&outcome) {
        println!("{}", line);
    }

    if outcome.interrupted {
        eprintln!(
            "Interrupted: moved {} of {} duplicate(s)",
            outcome.moved(),
            outcome.duplicates_found
        );
        std::process::exit(130);
    }

    if cli.strict && outcome.had_file_errors() {
        std::process::exit(3);
    }

    Ok(())
}

/// Console lines describing a finished run
fn summary_lines(outcome: &RunOutcome) -> Vec<String> {
    if !outcome.has_duplicates() {
        return vec!["No Duplicate Files Found".to_string()];
    }

    let mut lines = vec!["Duplicate Files Found, creating report...".to_string()];
    for record in &outcome.relocations {
        if let RelocationOutcome::Failed { message } = &record.outcome {
            lines.push(
                format_error_line(&record.pair.duplicate, message)
                    .trim_end()
                    .to_string(),
            );
        }
    }
    if let Some(ref report_path) = outcome.report_path {
        lines.push(format!("Report created at: {}", absolute(report_path).display()));
    }
    lines
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Save the run summary as pretty JSON
fn write_summary(path: &Path, outcome: &RunOutcome) -> Result<()> {
    let file = File::create(path)
        .context("Failed to create summary file")?;
    serde_json::to_writer_pretty(file, outcome)
        .context("Failed to write summary file")?;
    Ok(())
}
