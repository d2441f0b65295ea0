//! kbdlayout: validate and dump vendor XML keyboard layouts.
//!
//! # Usage
//!
//! ```text
//! kbdlayout [OPTIONS] <FILES>...
//!
//! Options:
//!   -v, --verbose          Trace every validated element
//!       --format <FORMAT>  Output format [possible values: text, json]
//!       --check            Only validate, print one status line per file
//!       --keep-going       Continue with the next file after a failure
//!       --config <FILE>    Configuration file [env: KBDLAYOUT_CONFIG]
//! ```
//!
//! Each file is parsed independently.  Without `--keep-going` the first
//! failure stops the run; with it, every file is attempted and the exit
//! status reports whether any of them failed.
//!
//! The log level comes from the configuration file (default `warn`), is
//! raised to `trace` by `--verbose`, and is overridden by `RUST_LOG`.

mod config;
mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use kbdlayout_core::{parse_layout, parse_layout_with_trace, TracingSink};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, CliConfig, OutputFormat};
use crate::report::LayoutReport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Strict parser for vendor XML keyboard layouts.
#[derive(Debug, Parser)]
#[command(
    name = "kbdlayout",
    about = "Validate and dump vendor XML keyboard layouts",
    version
)]
struct Cli {
    /// Trace every validated element and raise the log level to `trace`.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.  Overrides the configuration file.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Only validate; print `<file>: ok` instead of the layout.
    #[arg(long)]
    check: bool,

    /// Continue with the next file after a failure.
    #[arg(long)]
    keep_going: bool,

    /// Configuration file.  Defaults to the platform config directory.
    #[arg(long, env = "KBDLAYOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Layout documents to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Effective settings after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    verbose: bool,
    check: bool,
    keep_going: bool,
    format: OutputFormat,
    log_level: String,
}

impl Settings {
    fn resolve(cli: &Cli, config: CliConfig) -> Self {
        Self {
            verbose: cli.verbose,
            check: cli.check,
            keep_going: cli.keep_going || config.keep_going,
            format: cli.format.unwrap_or(config.format),
            log_level: if cli.verbose {
                "trace".to_string()
            } else {
                config.log_level
            },
        }
    }
}

// ── Processing ────────────────────────────────────────────────────────────────

/// Parses one document and writes its report to `out`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails to parse, or the
/// output cannot be written.
fn process_file(path: &Path, settings: &Settings, out: &mut impl Write) -> anyhow::Result<()> {
    let source =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let layout = if settings.verbose {
        parse_layout_with_trace(&source, &mut TracingSink)
    } else {
        parse_layout(&source)
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;

    info!(
        file = %path.display(),
        klid = layout.klid(),
        locale = layout.locale_name(),
        "parsed layout"
    );

    if settings.check {
        writeln!(out, "{}: ok", path.display())?;
        return Ok(());
    }

    match settings.format {
        OutputFormat::Text => write!(out, "{}", LayoutReport(&layout))?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &layout)
                .with_context(|| format!("failed to write JSON for {}", path.display()))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Processes every file, returning how many failed.
///
/// # Errors
///
/// Without `keep_going`, returns the first failure.
fn run(files: &[PathBuf], settings: &Settings, out: &mut impl Write) -> anyhow::Result<usize> {
    let mut failed = 0;
    for path in files {
        match process_file(path, settings, out) {
            Ok(()) => {}
            Err(e) if settings.keep_going => {
                error!("{e:#}");
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(failed)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let settings = Settings::resolve(&cli, config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let failed = run(&cli.files, &settings, &mut out)?;
    out.flush()?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} layouts failed", cli.files.len());
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
