//! 감사 오케스트레이터 -- 수집 → 트리아지 → 분석 → 저장
//!
//! # 상태 전환
//! ```text
//! Idle → Ingesting → Triaging → ShortCircuit
//!                             → Analyzing → Persisting → Done
//! Ingesting / Analyzing / Persisting → Failed
//! ```
//!
//! - 입력 파일이 없으면 모델을 호출하지 않고 [`AuditError::InputMissing`]으로 끝납니다.
//! - 트리아지 결과가 비어 있으면 모델을 호출하지 않고 보고서도 쓰지 않습니다.
//! - 모델 호출은 실행당 한 번이며 재시도하지 않습니다.
//! - 모델 호출이 실패하면 보고서를 쓰지 않습니다.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use logwarden_triage::{TriageFilter, TriageStats};

use crate::error::AuditError;
use crate::model::ModelClient;
use crate::prompt::PromptContract;
use crate::report::{AuditReport, ReportWriter};

/// 감사 실행 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditPhase {
    /// 시작 전
    Idle,
    /// 입력 로그 읽는 중
    Ingesting,
    /// 트리아지 중
    Triaging,
    /// 분석할 라인이 없어 조기 종료
    ShortCircuit,
    /// 모델 호출 중
    Analyzing,
    /// 보고서 저장 중
    Persisting,
    /// 완료
    Done,
    /// 실패로 종료
    Failed,
}

impl fmt::Display for AuditPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Ingesting => "ingesting",
            Self::Triaging => "triaging",
            Self::ShortCircuit => "short_circuit",
            Self::Analyzing => "analyzing",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// 감사 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// 보고서를 저장함
    Completed {
        /// 저장된 보고서 경로
        report_path: PathBuf,
        /// 트리아지 통계
        stats: TriageStats,
        /// 분석에 사용한 모델
        model: String,
    },
    /// 감사 대상 라인이 없어 모델을 호출하지 않음
    NothingToAnalyze {
        /// 트리아지 통계
        stats: TriageStats,
    },
}

impl AuditOutcome {
    /// 트리아지 통계
    pub fn stats(&self) -> &TriageStats {
        match self {
            Self::Completed { stats, .. } | Self::NothingToAnalyze { stats } => stats,
        }
    }

    /// 저장된 보고서 경로 (조기 종료 시 `None`)
    pub fn report_path(&self) -> Option<&Path> {
        match self {
            Self::Completed { report_path, .. } => Some(report_path),
            Self::NothingToAnalyze { .. } => None,
        }
    }
}

/// 감사 오케스트레이터
///
/// 실행 간에 공유하는 상태는 없습니다.
pub struct Auditor<M> {
    filter: TriageFilter,
    model: M,
    contract: PromptContract,
    writer: ReportWriter,
}

impl<M: ModelClient> Auditor<M> {
    /// 오케스트레이터를 생성합니다.
    pub fn new(
        filter: TriageFilter,
        model: M,
        contract: PromptContract,
        writer: ReportWriter,
    ) -> Self {
        Self {
            filter,
            model,
            contract,
            writer,
        }
    }

    /// 모델 클라이언트
    pub fn model(&self) -> &M {
        &self.model
    }

    /// 입력 파일을 읽어 한 번의 감사를 실행합니다.
    pub async fn run(&self, input_path: impl AsRef<Path>) -> Result<AuditOutcome, AuditError> {
        let input_path = input_path.as_ref();
        let ingested_at = Local::now();
        transition(AuditPhase::Idle, AuditPhase::Ingesting);

        let raw = match read_input(input_path).await {
            Ok(raw) => raw,
            Err(e) => {
                transition(AuditPhase::Ingesting, AuditPhase::Failed);
                return Err(e);
            }
        };

        debug!(path = %input_path.display(), bytes = raw.len(), "input ingested");
        self.process(&raw, ingested_at).await
    }

    /// 메모리의 로그 텍스트로 한 번의 감사를 실행합니다.
    pub async fn run_blob(&self, raw: &str) -> Result<AuditOutcome, AuditError> {
        let ingested_at = Local::now();
        transition(AuditPhase::Idle, AuditPhase::Ingesting);
        self.process(raw, ingested_at).await
    }

    async fn process(
        &self,
        raw: &str,
        ingested_at: DateTime<Local>,
    ) -> Result<AuditOutcome, AuditError> {
        transition(AuditPhase::Ingesting, AuditPhase::Triaging);
        let triaged = self.filter.apply(raw);
        let stats = triaged.stats.clone();

        if triaged.is_empty() {
            transition(AuditPhase::Triaging, AuditPhase::ShortCircuit);
            info!(
                total_lines = stats.total_lines,
                "no security-relevant events found, skipping analysis"
            );
            return Ok(AuditOutcome::NothingToAnalyze { stats });
        }

        transition(AuditPhase::Triaging, AuditPhase::Analyzing);
        let prompt = self.contract.render(&triaged.to_text());
        info!(
            model = self.model.model_name(),
            contract = self.contract.as_str(),
            version = self.contract.version(),
            kept_lines = stats.kept_lines,
            redactions = stats.redactions,
            "requesting compliance analysis"
        );

        let text = match self.model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                transition(AuditPhase::Analyzing, AuditPhase::Failed);
                warn!(error = %e, "model call failed, no report written");
                return Err(AuditError::Service(e));
            }
        };
        let report = AuditReport::new(text);

        transition(AuditPhase::Analyzing, AuditPhase::Persisting);
        let report_path = match self.writer.write(&report, ingested_at).await {
            Ok(path) => path,
            Err(e) => {
                transition(AuditPhase::Persisting, AuditPhase::Failed);
                return Err(e);
            }
        };

        transition(AuditPhase::Persisting, AuditPhase::Done);
        info!(path = %report_path.display(), bytes = report.len(), "audit report saved");

        Ok(AuditOutcome::Completed {
            report_path,
            stats,
            model: self.model.model_name().to_owned(),
        })
    }
}

/// 입력 로그 파일을 읽습니다.
///
/// 파일이 없으면 [`AuditError::InputMissing`], 그 외 읽기 실패는 [`AuditError::Input`]입니다.
/// UTF-8이 아닌 바이트는 대체 문자로 바꾸고 경고를 남깁니다.
pub async fn read_input(path: &Path) -> Result<String, AuditError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AuditError::InputMissing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(AuditError::Input {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match String::from_utf8(bytes) {
        Ok(raw) => Ok(raw),
        Err(e) => {
            warn!(
                path = %path.display(),
                valid_up_to = e.utf8_error().valid_up_to(),
                "input is not valid UTF-8, replacing invalid bytes"
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

fn transition(from: AuditPhase, to: AuditPhase) {
    debug!(%from, %to, "audit phase transition");
}
