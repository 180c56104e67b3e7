//! Logwarden CLI library
//!
//! The binary in `main.rs` only parses arguments, builds a single-threaded
//! runtime and maps [`CliError`](error::CliError) to an exit code.
//! Everything else lives here so the command handlers can be tested directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

use std::path::{Path, PathBuf};

use tracing::debug;

use logwarden_core::config::LogwardenConfig;
use logwarden_core::error::LogwardenError;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; a missing file is an error.
    Explicit(PathBuf),
    /// The default `logwarden.toml`; a missing file means built-in defaults.
    Default(PathBuf),
}

impl ConfigSource {
    /// Resolve the source from the `--config` flag.
    pub fn from_cli(config: Option<PathBuf>) -> Self {
        match config {
            Some(path) => Self::Explicit(path),
            None => Self::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Configuration file path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::Default(path) => path,
        }
    }

    /// Load, apply environment overrides, and validate.
    pub async fn load(&self) -> Result<LogwardenConfig, LogwardenError> {
        match self {
            Self::Explicit(path) => LogwardenConfig::load(path).await,
            Self::Default(path) => LogwardenConfig::load_or_default(path).await,
        }
    }

    /// Human-readable description for command output.
    pub fn describe(&self) -> String {
        match self {
            Self::Default(path) if !path.exists() => {
                format!("{} (not found, using defaults)", path.display())
            }
            _ => self.path().display().to_string(),
        }
    }
}

/// Run one CLI invocation.
///
/// Initializes logging from the loaded configuration, then dispatches to the
/// subcommand handler. Must be called once per process.
pub async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let source = ConfigSource::from_cli(cli.config);

    // `config validate` reports load errors itself, so logging falls back to defaults.
    let loaded = source.load().await;
    let general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Command(e.to_string()))?;

    debug!(config = %source.path().display(), "logwarden starting");

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &source, &writer).await,
        Commands::Audit(args) => commands::audit::execute(args, loaded?, &writer).await,
        Commands::Triage(args) => commands::triage::execute(args, &loaded?, &writer).await,
        Commands::Sample(args) => commands::sample::execute(args, &loaded?, &writer).await,
    }
}
