//! `logwarden audit` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use logwarden_analyzer::{AuditOutcome, Auditor, GeminiClient, PromptContract, ReportWriter};
use logwarden_core::config::LogwardenConfig;
use logwarden_triage::TriageFilter;

use crate::cli::AuditArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `audit` command.
///
/// The API key is resolved before the input is read, so a missing credential
/// fails fast with a configuration error even when the log file is absent.
pub async fn execute(
    args: AuditArgs,
    mut config: LogwardenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    apply_overrides(&mut config, args);
    config.validate()?;

    let contract: PromptContract = config
        .analysis
        .prompt_contract
        .parse()
        .map_err(CliError::Config)?;
    let api_key = config.analysis.resolve_api_key()?;
    let client = GeminiClient::from_config(&config.analysis, api_key)?;

    let auditor = Auditor::new(
        TriageFilter::from_config(&config.triage),
        client,
        contract,
        ReportWriter::from_config(&config.report),
    );

    let input = PathBuf::from(&config.audit.input_path);
    info!(
        input = %input.display(),
        model = %config.analysis.model,
        contract = contract.as_str(),
        "starting audit"
    );

    writer.progress(&progress_line(&input, &config.analysis.model, contract))?;
    let outcome = auditor.run(&input).await?;
    writer.render(&AuditSummary::new(&input, contract, outcome))?;

    Ok(())
}

/// Text shown while the model call is in flight.
fn progress_line(input: &Path, model: &str, contract: PromptContract) -> String {
    format!(
        "Auditing {} with {model} ({contract}); this can take a few minutes...",
        input.display()
    )
}

/// Apply command-line flags on top of the loaded configuration.
fn apply_overrides(config: &mut LogwardenConfig, args: AuditArgs) {
    if let Some(input) = args.input {
        config.audit.input_path = input.display().to_string();
    }
    if let Some(dir) = args.output_dir {
        config.report.output_dir = dir.display().to_string();
    }
    if let Some(contract) = args.contract {
        // `v1`..`v3` become canonical names; anything else is left for validate() to reject.
        config.analysis.prompt_contract = match contract.parse::<PromptContract>() {
            Ok(parsed) => parsed.as_str().to_owned(),
            Err(_) => contract,
        };
    }
    if let Some(model) = args.model {
        config.analysis.model = model;
    }
}

/// Result of one audit run.
#[derive(Serialize)]
pub struct AuditSummary {
    /// Input log file
    pub input: String,
    /// Prompt contract name
    pub contract: String,
    /// Prompt contract version
    pub contract_version: u32,
    /// Outcome with triage statistics
    #[serde(flatten)]
    pub outcome: AuditOutcome,
}

impl AuditSummary {
    pub fn new(input: &Path, contract: PromptContract, outcome: AuditOutcome) -> Self {
        Self {
            input: input.display().to_string(),
            contract: contract.as_str().to_owned(),
            contract_version: contract.version(),
            outcome,
        }
    }
}

impl Render for AuditSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let stats = self.outcome.stats();
        match &self.outcome {
            AuditOutcome::Completed {
                report_path, model, ..
            } => {
                writeln!(
                    w,
                    "{} Audit report saved: {}",
                    "✓".green().bold(),
                    report_path.display().to_string().bold()
                )?;
                writeln!(w, "  Input:      {}", self.input)?;
                writeln!(
                    w,
                    "  Events:     {} of {} lines relevant, {} values redacted",
                    stats.kept_lines, stats.total_lines, stats.redactions
                )?;
                writeln!(w, "  Model:      {model}")?;
                writeln!(
                    w,
                    "  Contract:   {} (v{})",
                    self.contract, self.contract_version
                )?;
            }
            AuditOutcome::NothingToAnalyze { .. } => {
                writeln!(
                    w,
                    "{} No security-relevant events found in {} ({} lines scanned). Analysis skipped.",
                    "-".yellow().bold(),
                    self.input,
                    stats.total_lines
                )?;
            }
        }
        Ok(())
    }
}
