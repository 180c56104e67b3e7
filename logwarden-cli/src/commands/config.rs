//! `logwarden config` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::ConfigSource;
use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Configuration sections accepted by `config show --section`.
pub const SECTIONS: [&str; 5] = ["general", "triage", "analysis", "audit", "report"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    source: &ConfigSource,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(source, writer).await,
        ConfigAction::Show { section } => execute_show(source, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values,
/// an explicitly given file that does not exist).
async fn execute_validate(source: &ConfigSource, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %source.path().display(), "validating configuration");

    let report = match source.load().await {
        Ok(_) => ConfigValidationReport {
            source: source.describe(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: source.describe(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
/// The API key itself is never shown; only whether its variable is set.
async fn execute_show(
    source: &ConfigSource,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %source.path().display(), "loading configuration");

    let config = source.load().await?;
    let config_toml = match section.as_deref() {
        None => to_toml(&config)?,
        Some("general") => to_toml(&config.general)?,
        Some("triage") => to_toml(&config.triage)?,
        Some("analysis") => to_toml(&config.analysis)?,
        Some("audit") => to_toml(&config.audit)?,
        Some("report") => to_toml(&config.report)?,
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    };

    let report = ConfigReport {
        source: source.describe(),
        section,
        credential_env: config.analysis.api_key_env.clone(),
        credential_set: config.analysis.resolve_api_key().is_ok(),
        config_toml,
    };

    writer.render(&report)?;

    Ok(())
}

fn to_toml<T: Serialize>(value: &T) -> Result<String, CliError> {
    toml::to_string_pretty(value)
        .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source description
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Environment variable holding the API key
    pub credential_env: String,
    /// Whether that variable is set and non-empty
    pub credential_set: bool,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        let status = if self.credential_set {
            "set".green()
        } else {
            "not set".yellow()
        };
        writeln!(w, "API key: ${} ({})", self.credential_env, status)?;

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source description
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logwarden_core::config::LogwardenConfig;

    #[test]
    fn test_config_report_render_text_full_config() {
        let report = ConfigReport {
            source: "logwarden.toml".to_owned(),
            section: None,
            credential_env: "GEMINI_API_KEY".to_owned(),
            credential_set: false,
            config_toml: "[general]\nlog_level = \"warn\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Configuration"), "should contain header");
        assert!(output.contains("logwarden.toml"));
        assert!(output.contains("$GEMINI_API_KEY"));
        assert!(output.contains("not set"));
        assert!(output.contains("log_level"));
    }

    #[test]
    fn test_config_report_render_text_specific_section() {
        let report = ConfigReport {
            source: "/etc/logwarden.toml".to_owned(),
            section: Some("triage".to_owned()),
            credential_env: "GEMINI_API_KEY".to_owned(),
            credential_set: true,
            config_toml: "sentinel = \"[REDACTED]\"".to_owned(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("[triage]"), "should show section name");
        assert!(output.contains("sentinel"));
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "test.toml".to_owned(),
            section: Some("analysis".to_owned()),
            credential_env: "GEMINI_API_KEY".to_owned(),
            credential_set: true,
            config_toml: "model = \"gemini-2.5-flash\"".to_owned(),
        };

        let json = serde_json::to_value(&report).expect("JSON serialization should succeed");
        assert_eq!(json["section"].as_str(), Some("analysis"));
        assert_eq!(json["credential_set"].as_bool(), Some(true));
        assert!(json.get("config_toml").is_none());
    }

    #[test]
    fn test_config_validation_report_invalid() {
        let report = ConfigValidationReport {
            source: "bad.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'triage.sentinel'".to_owned()],
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("INVALID"));
        assert!(output.contains("triage.sentinel"));
    }

    #[test]
    fn test_config_validation_report_valid() {
        let report = ConfigValidationReport {
            source: "logwarden.toml".to_owned(),
            valid: true,
            errors: Vec::new(),
        };

        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("VALID"));
        assert!(!output.contains("Error:"));
    }

    #[test]
    fn test_every_section_serializes() {
        let config = LogwardenConfig::default();
        assert!(to_toml(&config.general).is_ok());
        assert!(to_toml(&config.triage).is_ok());
        assert!(to_toml(&config.analysis).is_ok());
        assert!(to_toml(&config.audit).is_ok());
        assert!(to_toml(&config.report).is_ok());
        let full = to_toml(&config).expect("full config");
        for section in SECTIONS {
            assert!(full.contains(&format!("[{section}]")), "missing [{section}]");
        }
    }
}
