//! filescancrypt - Directory inventory with an encryption time estimate.
//!
//! Usage:
//!   filescancrypt <PATH>                 Scan with the default 50 MB/s estimate
//!   filescancrypt <PATH> -v 60           Scan assuming 60 MB/s
//!   filescancrypt <PATH> --format json   Print the report as JSON
//!   filescancrypt --help                 Show help

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use crossterm::style::Stylize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use filescancrypt_core::{DEFAULT_ENCRYPTION_SPEED, ScanConfig, ScanReport};
use filescancrypt_scan::ScanSession;

const RULE_WIDTH: usize = 50;

#[derive(Parser)]
#[command(
    name = "filescancrypt",
    version,
    about = "Scan a directory tree and estimate how long encrypting it would take",
    long_about = "filescancrypt counts the files and folders under a directory, sums \
                  their sizes and estimates the time needed to encrypt that volume at \
                  a given throughput. Nothing is encrypted.",
    after_help = "Example: filescancrypt /path/to/directory -v 60\n\
                  Pass your machine's real encryption speed with -v for an accurate estimate."
)]
struct Cli {
    /// Directory to scan
    path: PathBuf,

    /// Encryption speed in MB/s
    #[arg(short = 'v', long, default_value_t = DEFAULT_ENCRYPTION_SPEED)]
    speed: f64,

    /// Progress refresh interval in milliseconds
    #[arg(long, default_value = "100")]
    interval_ms: u64,

    /// Do not draw the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ScanConfig::builder()
        .root(cli.path.clone())
        .encryption_speed(cli.speed)
        .poll_interval(Duration::from_millis(cli.interval_ms))
        .show_progress(!cli.no_progress)
        .build()
        .wrap_err("Invalid arguments")?;
    debug!(?config, "parsed configuration");

    if !cli.path.exists() {
        bail!("The path '{}' does not exist", cli.path.display());
    }

    if matches!(cli.format, OutputFormat::Text) {
        print_banner(&config);
    }

    let report = ScanSession::new(config)
        .run()
        .wrap_err("Scan could not start")?;

    match cli.format {
        OutputFormat::Text => print_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

/// Print the startup banner.
fn print_banner(config: &ScanConfig) {
    let title = format!("FileScanCrypt v{}", env!("CARGO_PKG_VERSION"));

    println!();
    println!("{}", "*".repeat(RULE_WIDTH).cyan());
    println!("{}", format!("{title:^RULE_WIDTH$}").cyan());
    println!("{}", "*".repeat(RULE_WIDTH).cyan());
    println!();
    println!(
        "{} {}",
        "Starting scan in:".yellow(),
        config.root.display().to_string().white()
    );
    println!(
        "{} {}  {}",
        "Encryption speed (MB/s):".yellow(),
        config.encryption_speed.to_string().white(),
        "(for a more accurate estimate, pass your real speed with -v)".yellow()
    );
    println!();
}

/// Print the final report.
fn print_report(report: &ScanReport) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH).magenta());

    if let Some(error) = &report.scan_error {
        println!("{}", format!("Error during scan: {error}").red());
    }

    println!("{}", "Scan results:".green());
    print_field("Total files found:", report.total_files.to_string());
    print_field("Total folders found:", report.total_dirs.to_string());
    print_field("Total file size:", format!("{:.2} MB", report.size_mb));
    print_field(
        "Total scan time:",
        format!("{:.2} seconds", report.elapsed.as_secs_f64()),
    );
    if report.read_errors > 0 {
        println!(
            "{}",
            format!("{} entries could not be read", report.read_errors).yellow()
        );
    }

    println!("{}", "-".repeat(RULE_WIDTH).red());
    if report.has_data() {
        println!("{}", "Estimated time to encrypt all files:".red());
        println!(
            "{}",
            format!(
                "- Approximately {:.2} seconds ({:.2} minutes)",
                report.estimate.seconds, report.estimate.minutes
            )
            .white()
        );
    } else {
        println!("{}", "No files to encrypt.".red());
    }
    println!("{}", "=".repeat(RULE_WIDTH).magenta());
    println!();
}

fn print_field(label: &str, value: String) {
    println!("{} {}", label.blue(), value.white());
}
