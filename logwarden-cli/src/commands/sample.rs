//! `logwarden sample` command handler
//!
//! Synthesises a system log mixing routine noise (about 85%) with anomalies,
//! one entry every 172 seconds. Useful for trying `triage` and `audit`
//! without real logs.
//!
//! Not every anomaly is security-relevant (low disk space, outbound transfers),
//! so the summary also reports how many lines the configured triage keeps.

use std::io::Write;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use logwarden_core::config::LogwardenConfig;
use logwarden_triage::TriageFilter;

use crate::cli::SampleArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Share of generated lines that are routine noise.
pub const NOISE_RATIO: f64 = 0.85;

/// Seconds between consecutive entries.
pub const SPACING_SECS: i64 = 172;

const HOSTS: &[&str] = &["192.168.1.10", "10.0.0.5", "172.16.254.1", "192.168.1.50"];
const HOSTILE_HOSTS: &[&str] = &["45.33.22.11", "185.220.101.5"];
const USERS: &[&str] = &["admin", "jdoe", "db_user", "webapp", "backup_user"];
const FILES: &[&str] = &[
    "payroll_2023.csv",
    "customers.db",
    "config.yaml",
    "secrets.env",
    "backup.tar.gz",
];
const RULES: &[u16] = &[101, 205, 305, 405, 502];

/// Synthetic log generator.
pub struct SampleGenerator {
    rng: StdRng,
    start: NaiveDateTime,
}

/// Generated log with a breakdown of line kinds.
#[derive(Debug, Clone)]
pub struct SampleLog {
    /// Log lines, oldest first
    pub lines: Vec<String>,
    /// Number of non-routine lines
    pub issues: usize,
}

impl SampleGenerator {
    /// Generator with a fixed seed and start time (fully reproducible).
    pub fn seeded(seed: u64) -> Self {
        let start = NaiveDate::from_ymd_opt(2023, 10, 27)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            rng: StdRng::seed_from_u64(seed),
            start,
        }
    }

    /// Generator starting 24 hours before now.
    pub fn from_now() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            start: Local::now().naive_local() - Duration::hours(24),
        }
    }

    /// Generate `count` lines.
    pub fn generate(&mut self, count: usize) -> SampleLog {
        let mut lines = Vec::with_capacity(count);
        let mut issues = 0;

        for i in 0..count {
            let at = self.start + Duration::seconds(SPACING_SECS * i as i64);
            let message = if self.rng.random::<f64>() < NOISE_RATIO {
                self.noise()
            } else {
                issues += 1;
                self.issue()
            };
            lines.push(format!("[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message));
        }

        SampleLog { lines, issues }
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }

    fn secret(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(12)
            .map(char::from)
            .collect()
    }

    fn noise(&mut self) -> String {
        match self.rng.random_range(0..4) {
            0 => format!(
                "INFO: System health check - CPU {}% Memory {}%",
                self.rng.random_range(5..=40),
                self.rng.random_range(20..=60)
            ),
            1 => "INFO: Cron job 'cleanup_tmp' completed successfully.".to_owned(),
            2 => {
                let user = self.pick(USERS);
                let host = self.pick(HOSTS);
                format!("INFO: User '{user}' logged in from {host}.")
            }
            _ => {
                let user = self.pick(USERS);
                let host = self.pick(HOSTS);
                format!("INFO: {user} login success from IP {host}")
            }
        }
    }

    fn issue(&mut self) -> String {
        let mut user = self.pick(USERS);
        if self.rng.random_bool(0.2) {
            user = "root";
        }
        let host = if self.rng.random_bool(0.5) {
            self.pick(HOSTILE_HOSTS)
        } else {
            self.pick(HOSTS)
        };

        match self.rng.random_range(0..10) {
            0 => "WARN: Low disk space on /var/log (85% full).".to_owned(),
            1 => format!("ERROR: Failed login attempt for user '{user}' from {host}."),
            2 => format!("CRITICAL: Unauthorized sudo attempt by '{user}' on /etc/shadow!"),
            3 => "ERROR: Connection timeout from database_cluster_01.".to_owned(),
            4 => {
                let target = self.pick(HOSTILE_HOSTS);
                let size = self.rng.random_range(500..=2000);
                format!("INFO: Outbound connection established to {target}:443 [Data: {size}MB]")
            }
            5 => {
                let rule = self.pick(RULES);
                format!(
                    "WARN: firewall_alert: Rule {rule} (Deny All) modified by {user} to Allow 0.0.0.0/0"
                )
            }
            6 => {
                let file = self.pick(FILES);
                format!("WARN: sensitive_file_access: '{file}' accessed by {user}")
            }
            7 => format!("WARN: {user} login failure from IP {host}"),
            8 => {
                let secret = self.secret();
                format!("ERROR: Authentication failed for user '{user}' password={secret}")
            }
            _ => {
                let secret = self.secret();
                format!("ERROR: API request denied from {host} token={secret} (403 Forbidden)")
            }
        }
    }
}

/// Execute the `sample` command.
pub async fn execute(
    args: SampleArgs,
    config: &LogwardenConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.audit.input_path));

    if !args.force && tokio::fs::try_exists(&out).await? {
        return Err(CliError::Command(format!(
            "{} already exists (use --force to overwrite)",
            out.display()
        )));
    }

    let mut generator = match args.seed {
        Some(seed) => SampleGenerator::seeded(seed),
        None => SampleGenerator::from_now(),
    };
    let log = generator.generate(args.count);

    let mut content = log.lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    let relevant = TriageFilter::from_config(&config.triage)
        .apply(&content)
        .stats
        .kept_lines;
    tokio::fs::write(&out, content).await?;
    info!(path = %out.display(), lines = log.lines.len(), relevant, "sample log written");

    writer.render(&SampleReport {
        path: out.display().to_string(),
        lines: log.lines.len(),
        anomalies: log.issues,
        relevant,
        seed: args.seed,
    })?;

    Ok(())
}

/// Summary of a generated sample log.
#[derive(Serialize)]
pub struct SampleReport {
    /// Written file
    pub path: String,
    /// Total lines
    pub lines: usize,
    /// Injected non-routine lines
    pub anomalies: usize,
    /// Lines the configured triage keeps
    pub relevant: usize,
    /// Seed, if one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Render for SampleReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{} Generated {} lines ({} anomalies, {} kept by triage) in {}",
            "✓".green().bold(),
            self.lines,
            self.anomalies,
            self.relevant,
            self.path.bold()
        )
    }
}
