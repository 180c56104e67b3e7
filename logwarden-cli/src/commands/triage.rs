//! `logwarden triage` command handler
//!
//! Dry run of the preprocessing stage: shows exactly what `audit` would send
//! to the model. Needs no credential and makes no network call.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use logwarden_analyzer::read_input;
use logwarden_core::config::LogwardenConfig;
use logwarden_triage::{TriageFilter, TriageResult};

use crate::cli::TriageArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `triage` command.
pub async fn execute(
    args: TriageArgs,
    config: &LogwardenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let input = args
        .input
        .unwrap_or_else(|| PathBuf::from(&config.audit.input_path));
    info!(input = %input.display(), "triaging log file");

    let raw = read_input(&input).await?;
    let result = TriageFilter::from_config(&config.triage).apply(&raw);

    let report = TriageReport {
        source: input.display().to_string(),
        show_stats: args.stats,
        result,
    };
    writer.render(&report)?;

    Ok(())
}

/// Triage output: surviving lines plus statistics.
#[derive(Serialize)]
pub struct TriageReport {
    /// Input log file
    pub source: String,
    /// Append a statistics block in text mode
    #[serde(skip)]
    pub show_stats: bool,
    /// Lines and statistics
    #[serde(flatten)]
    pub result: TriageResult,
}

impl Render for TriageReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for line in &self.result.lines {
            writeln!(w, "{}", line.text)?;
        }

        if self.show_stats {
            let stats = &self.result.stats;
            writeln!(w)?;
            writeln!(w, "Triage summary ({})", self.source)?;
            writeln!(w, "  Lines read:     {}", stats.total_lines)?;
            writeln!(w, "  Lines kept:     {}", stats.kept_lines)?;
            writeln!(w, "  Lines dropped:  {}", stats.dropped_lines)?;
            writeln!(w, "  Redactions:     {}", stats.redactions)?;
            for (category, hits) in &stats.category_hits {
                writeln!(w, "  {:<22}{}", format!("{category}:"), hits)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(show_stats: bool) -> TriageReport {
        let raw = "\
INFO: health check cpu=12%
ERROR: login failed user=admin password=Secr3t!
CRITICAL: Unauthorized sudo attempt by 'root' on /etc/shadow!";
        TriageReport {
            source: "system_logs.txt".to_owned(),
            show_stats,
            result: TriageFilter::default().apply(raw),
        }
    }

    #[test]
    fn test_render_lines_only() {
        let mut buffer = Vec::new();
        report(false).render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert_eq!(
            output,
            "ERROR: login failed user=admin password=[REDACTED]\n\
             CRITICAL: Unauthorized sudo attempt by 'root' on /etc/shadow!\n"
        );
    }

    #[test]
    fn test_render_with_stats() {
        let mut buffer = Vec::new();
        report(true).render_text(&mut buffer).expect("render");
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("Triage summary (system_logs.txt)"));
        assert!(output.contains("Lines read:     3"));
        assert!(output.contains("Lines kept:     2"));
        assert!(output.contains("Redactions:     1"));
        assert!(output.contains("privilege_escalation:"));
    }

    #[test]
    fn test_json_carries_lines_and_stats() {
        let json = serde_json::to_value(report(false)).expect("serialize");
        assert_eq!(json["source"], "system_logs.txt");
        assert!(json.get("show_stats").is_none());
        assert_eq!(json["lines"].as_array().expect("lines").len(), 2);
        assert_eq!(json["lines"][0]["line_no"], 2);
        assert_eq!(json["lines"][0]["redactions"], 1);
        assert_eq!(json["stats"]["kept_lines"], 2);
        assert_eq!(json["stats"]["category_hits"]["error"], 1);
    }
}
