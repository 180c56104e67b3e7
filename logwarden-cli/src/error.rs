//! CLI-specific error types and exit code mapping

use logwarden_analyzer::{AuditError, ServiceError};
use logwarden_core::error::{ConfigError, LogwardenError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The input log file does not exist.
    #[error("{0}")]
    InputMissing(String),

    /// The model service call failed.
    #[error("{0}")]
    Service(String),

    /// The report could not be written.
    #[error("{0}")]
    Persistence(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from logwarden-core.
    #[error("{0}")]
    Core(#[from] LogwardenError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success (including nothing to analyze) |
    /// | 1    | General / command error               |
    /// | 2    | Configuration error, missing API key  |
    /// | 3    | Input log file missing                |
    /// | 4    | Model service failure                 |
    /// | 5    | Report could not be written           |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LogwardenError::Config(_)) => 2,
            Self::InputMissing(_) => 3,
            Self::Service(_) => 4,
            Self::Persistence(_) => 5,
            Self::Io(_) | Self::Core(LogwardenError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(LogwardenError::Config(e))
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        Self::Service(format!("analysis failed: {e}"))
    }
}

impl From<AuditError> for CliError {
    fn from(e: AuditError) -> Self {
        match e {
            AuditError::InputMissing { .. } => Self::InputMissing(e.to_string()),
            AuditError::Input { source, .. } => Self::Io(source),
            AuditError::Service(_) => Self::Service(e.to_string()),
            AuditError::Persistence { .. } => Self::Persistence(e.to_string()),
        }
    }
}
