//! 트리아지 필터 -- 관련성 필터링 + 민감 값 마스킹
//!
//! [`TriageFilter::apply`]는 원시 로그 텍스트 전체를 받아 감사 대상 라인만
//! 입력 순서대로 남기고, 남은 라인의 민감 값을 마스킹합니다.
//! I/O가 없는 순수 변환이며 어떤 입력에서도 실패하지 않습니다.
//!
//! # 처리 순서 (라인 단위)
//! 1. 대문자 사본으로 관련성 검사 -- 매칭 없으면 버림
//! 2. 원본 대소문자 라인에 마스킹 적용
//! 3. 마스킹된 라인으로 다시 분류 -- 민감 값만 매칭됐던 라인은 버림
//!
//! 3단계 덕분에 비밀 값이 관련성을 결정하지 않으며, 결과를 다시 필터링해도
//! 같은 결과가 나옵니다.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use logwarden_core::config::TriageConfig;
use logwarden_core::types::EventCategory;

use crate::redact::Redactor;
use crate::vocabulary::Vocabulary;

/// 트리아지를 통과한 한 라인
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriagedLine {
    /// 입력에서의 라인 번호 (1부터)
    pub line_no: usize,
    /// 마스킹된 텍스트
    pub text: String,
    /// 매칭된 분류
    pub categories: Vec<EventCategory>,
    /// 이 라인에서 대체된 값의 개수
    pub redactions: usize,
}

/// 트리아지 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageStats {
    /// 입력 라인 수
    pub total_lines: usize,
    /// 통과한 라인 수
    pub kept_lines: usize,
    /// 버린 라인 수
    pub dropped_lines: usize,
    /// 전체 대체 횟수
    pub redactions: usize,
    /// 분류별 라인 수 (한 라인이 여러 분류에 속할 수 있음)
    pub category_hits: BTreeMap<EventCategory, usize>,
}

/// 트리아지 결과
///
/// 입력 순서를 유지하며, 어떤 라인도 매칭되지 않았을 때에만 비어 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageResult {
    /// 통과한 라인 (입력 순서)
    pub lines: Vec<TriagedLine>,
    /// 통계
    pub stats: TriageStats,
}

impl TriageResult {
    /// 통과한 라인이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 통과한 라인 수
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 라인을 개행으로 이어 붙인 텍스트. 결과가 비어 있으면 빈 문자열입니다.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                text.push('\n');
            }
            text.push_str(&line.text);
        }
        text
    }
}

/// 트리아지 필터
#[derive(Debug, Clone, Default)]
pub struct TriageFilter {
    vocabulary: Vocabulary,
    redactor: Redactor,
}

impl TriageFilter {
    /// 어휘와 마스커로 필터를 생성합니다.
    pub fn new(vocabulary: Vocabulary, redactor: Redactor) -> Self {
        Self {
            vocabulary,
            redactor,
        }
    }

    /// `[triage]` 설정 섹션에서 필터를 생성합니다.
    pub fn from_config(config: &TriageConfig) -> Self {
        let vocabulary =
            Vocabulary::with_overrides(&config.vocabulary, config.replace_default_vocabulary);
        let redactor = Redactor::new(&config.sensitive_keys, config.sentinel.clone());
        Self::new(vocabulary, redactor)
    }

    /// 원시 로그 텍스트에 트리아지를 적용합니다.
    pub fn apply(&self, raw: &str) -> TriageResult {
        let mut result = TriageResult::default();

        for (idx, line) in raw.lines().enumerate() {
            result.stats.total_lines += 1;
            // 남은 CR이 재필터링 시 개행으로 바뀌지 않도록 제거
            let line = line.trim_end_matches('\r');

            if !self.vocabulary.is_relevant(line) {
                continue;
            }

            let redacted = self.redactor.redact_counted(line);
            let categories = self.vocabulary.classify(&redacted.text);
            if categories.is_empty() {
                debug!(line_no = idx + 1, "line matched only inside a redacted value");
                continue;
            }

            for category in &categories {
                *result.stats.category_hits.entry(*category).or_insert(0) += 1;
            }
            result.stats.redactions += redacted.count;
            result.lines.push(TriagedLine {
                line_no: idx + 1,
                text: redacted.text.into_owned(),
                categories,
                redactions: redacted.count,
            });
        }

        result.stats.kept_lines = result.lines.len();
        result.stats.dropped_lines = result.stats.total_lines - result.stats.kept_lines;

        debug!(
            total = result.stats.total_lines,
            kept = result.stats.kept_lines,
            redactions = result.stats.redactions,
            "triage complete"
        );

        result
    }

    /// 트리아지 결과를 텍스트로 반환합니다.
    pub fn apply_to_text(&self, raw: &str) -> String {
        self.apply(raw).to_text()
    }
}

/// 기본 어휘와 기본 민감 키로 트리아지한 텍스트를 반환합니다.
///
/// ```
/// let out = logwarden_triage::triage(
///     "INFO: health check cpu=12%\nERROR: login failed user=admin password=Secr3t!",
/// );
/// assert_eq!(out, "ERROR: login failed user=admin password=[REDACTED]");
/// ```
pub fn triage(raw: &str) -> String {
    TriageFilter::default().apply_to_text(raw)
}
