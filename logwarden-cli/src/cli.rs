//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file, used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "logwarden.toml";

/// Logwarden -- triage system logs and produce an AI-assisted compliance audit report.
///
/// Use `logwarden <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logwarden", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logwarden.toml configuration file.
    ///
    /// When omitted, `logwarden.toml` is used if present and defaults otherwise.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a full audit: ingest, triage, analyze, and save a dated report.
    Audit(AuditArgs),

    /// Dry run: show what would be sent to the model.
    Triage(TriageArgs),

    /// Generate a synthetic system log for testing.
    Sample(SampleArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- audit ----

/// Run a one-shot compliance audit.
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Input log file (default: `[audit] input_path`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for the report (default: `[report] output_dir`).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Prompt contract (narrative, findings, tabular).
    #[arg(long)]
    pub contract: Option<String>,

    /// Model identifier (default: `[analysis] model`).
    #[arg(long)]
    pub model: Option<String>,
}

// ---- triage ----

/// Filter and redact a log file without calling the model.
#[derive(Args, Debug)]
pub struct TriageArgs {
    /// Input log file (default: `[audit] input_path`).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print a statistics summary after the triaged lines.
    #[arg(long)]
    pub stats: bool,
}

// ---- sample ----

/// Generate a synthetic log file mixing routine noise and anomalies.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Number of lines to generate.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub count: usize,

    /// Seed for reproducible output.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (default: `[audit] input_path`).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(short, long)]
    pub force: bool,
}

// ---- config ----

/// Manage logwarden configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, triage, analysis, audit, report).
        #[arg(long)]
        section: Option<String>,
    },
}
