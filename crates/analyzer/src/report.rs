//! 보고서 저장 -- 타임스탬프 파일 이름, 한 번만 쓰기
//!
//! 파일 이름: `{prefix}_{YYYYMMDD_HHMMSS}.md`
//!
//! 파일은 `create_new`로 열기 때문에 기존 보고서를 덮어쓰거나 이어 쓰지 않습니다.
//! 같은 초에 이미 파일이 있으면 `{prefix}_{YYYYMMDD_HHMMSS}_{n}.md`를 시도합니다.
//! 쓰기 도중 실패하면 만들어진 파일을 지우므로 불완전한 보고서가 남지 않습니다.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use logwarden_core::config::ReportConfig;

use crate::error::AuditError;

/// 파일 이름 타임스탬프 형식
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 이름 충돌 시 시도할 최대 접미사
const MAX_COLLISION_SUFFIX: u32 = 99;

/// 모델이 반환한 감사 보고서 본문
///
/// 받은 뒤에는 변경하지 않으며 그대로 저장합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    text: String,
}

impl AuditReport {
    /// 모델 응답으로 보고서를 만듭니다.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// 보고서 본문
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 본문 바이트 길이
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// 본문이 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// 보고서 파일 저장기
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    file_prefix: String,
}

impl ReportWriter {
    /// 출력 디렉토리와 파일 접두사로 생성합니다.
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    /// `[report]` 설정 섹션으로 생성합니다.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.output_dir, config.file_prefix.clone())
    }

    /// `now` 시각에 대한 보고서 경로 (충돌 접미사 없음)
    pub fn path_for(&self, now: DateTime<Local>) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.md",
            self.file_prefix,
            now.format(TIMESTAMP_FORMAT)
        ))
    }

    fn path_with_suffix(&self, now: DateTime<Local>, suffix: u32) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_{suffix}.md",
            self.file_prefix,
            now.format(TIMESTAMP_FORMAT)
        ))
    }

    /// 보고서를 새 파일에 쓰고 경로를 반환합니다.
    ///
    /// 실패하면 쓰려던 경로와 원인을 담은 [`AuditError::Persistence`]를 반환합니다.
    pub async fn write(
        &self,
        report: &AuditReport,
        now: DateTime<Local>,
    ) -> Result<PathBuf, AuditError> {
        let first = self.path_for(now);
        if let Err(source) = tokio::fs::create_dir_all(&self.output_dir).await {
            return Err(AuditError::Persistence {
                path: first,
                source,
            });
        }

        let mut path = first;
        let mut suffix = 0;
        let file = loop {
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break file,
                Err(e)
                    if e.kind() == std::io::ErrorKind::AlreadyExists
                        && suffix < MAX_COLLISION_SUFFIX =>
                {
                    suffix += 1;
                    debug!(path = %path.display(), "report file exists, trying next name");
                    path = self.path_with_suffix(now, suffix);
                }
                Err(source) => return Err(AuditError::Persistence { path, source }),
            }
        };

        persist(file, path, report).await
    }
}

/// 열린 `sink`에 본문을 쓰고 flush합니다.
///
/// 실패하면 `sink`를 닫고 `path`의 파일을 지운 뒤 [`AuditError::Persistence`]를 반환합니다.
async fn persist<W>(
    mut sink: W,
    path: PathBuf,
    report: &AuditReport,
) -> Result<PathBuf, AuditError>
where
    W: AsyncWrite + Unpin,
{
    let written = match sink.write_all(report.as_str().as_bytes()).await {
        Ok(()) => sink.flush().await,
        Err(e) => Err(e),
    };
    drop(sink);

    if let Err(source) = written {
        remove_partial(&path).await;
        return Err(AuditError::Persistence { path, source });
    }

    debug!(path = %path.display(), bytes = report.len(), "report written");
    Ok(path)
}

/// 불완전한 보고서 파일을 지웁니다. 삭제 실패는 경고만 남깁니다.
async fn remove_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove partial report");
    } else {
        debug!(path = %path.display(), "partial report removed");
    }
}
