//! 프롬프트 계약 -- 시스템 지시문 + 기대 출력 형식의 버전 관리
//!
//! 지시문은 보고서 형식을 결정하는 계약이므로 하나의 버전 값으로 선택합니다.
//! 오케스트레이터는 어떤 계약이 선택됐는지 알 필요가 없습니다.
//!
//! | 버전 | 이름 | 출력 형식 |
//! |------|------|-----------|
//! | 1 | `narrative` | HIGH/MEDIUM/LOW 헤더가 있는 Markdown 요약 |
//! | 2 | `findings` | 통제 ID 라이브러리에 매핑된 목록형 발견 사항 |
//! | 3 | `tabular` | 심각도별 고정 열 표 + 빈 버킷 대체 행 |

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// 발견 사항을 매핑할 통제 ID 라이브러리
pub const CONTROL_LIBRARY: &[(&str, &str)] = &[
    ("AC-2", "NIST 800-53 Account Management"),
    ("AC-3", "NIST 800-53 Access Enforcement"),
    ("AC-6", "NIST 800-53 Least Privilege"),
    ("AC-7", "NIST 800-53 Unsuccessful Logon Attempts"),
    ("AU-2", "NIST 800-53 Event Logging"),
    ("AU-6", "NIST 800-53 Audit Record Review, Analysis, and Reporting"),
    ("IA-2", "NIST 800-53 Identification and Authentication"),
    ("IA-5", "NIST 800-53 Authenticator Management"),
    ("SC-7", "NIST 800-53 Boundary Protection"),
    ("SI-4", "NIST 800-53 System Monitoring"),
    ("CC6.1", "SOC 2 Logical Access Security"),
    ("CC6.2", "SOC 2 User Registration and Authorization"),
    ("CC6.6", "SOC 2 External Threat Protection"),
    ("CC7.2", "SOC 2 Anomaly Monitoring"),
];

/// 표 형식 계약의 열 머리글
pub const TABLE_HEADER: &str = "| Timestamp | Event | Control ID | Risk | Recommendation |";

/// 표 형식 계약에서 빈 심각도 버킷에 넣는 행
pub const FALLBACK_ROW: &str = "| - | No findings | - | - | - |";

const NARRATIVE_INSTRUCTION: &str = "\
ACT AS: Senior SOC2 Auditor.
TASK: Analyze the provided logs for security breaches, NIST violations, or suspicious patterns.
OUTPUT: Provide a 'Security Audit Summary' in Markdown format with headers for HIGH, MEDIUM, and LOW risks.";

/// 프롬프트 계약 버전
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptContract {
    /// v1: 자유 서술형 Markdown 요약
    Narrative,
    /// v2: 통제 ID에 매핑된 목록형 발견 사항
    Findings,
    /// v3: 고정 열 표 형식
    #[default]
    Tabular,
}

impl PromptContract {
    /// 계약 버전 번호
    pub fn version(&self) -> u32 {
        match self {
            Self::Narrative => 1,
            Self::Findings => 2,
            Self::Tabular => 3,
        }
    }

    /// 설정 파일에서 쓰는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Narrative => "narrative",
            Self::Findings => "findings",
            Self::Tabular => "tabular",
        }
    }

    /// 시스템 지시문
    pub fn system_instruction(&self) -> String {
        match self {
            Self::Narrative => NARRATIVE_INSTRUCTION.to_owned(),
            Self::Findings => findings_instruction(),
            Self::Tabular => tabular_instruction(),
        }
    }

    /// 트리아지된 로그 텍스트로 프롬프트를 만듭니다.
    pub fn render(&self, triaged: &str) -> AuditPrompt {
        AuditPrompt {
            contract: *self,
            system_instruction: self.system_instruction(),
            log_data: triaged.to_owned(),
        }
    }
}

impl fmt::Display for PromptContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (v{})", self.as_str(), self.version())
    }
}

impl FromStr for PromptContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "narrative" | "v1" => Ok(Self::Narrative),
            "findings" | "v2" => Ok(Self::Findings),
            "tabular" | "v3" => Ok(Self::Tabular),
            other => Err(format!(
                "unknown prompt contract: {other} (expected: narrative, findings, tabular)"
            )),
        }
    }
}

fn control_library_lines() -> String {
    CONTROL_LIBRARY
        .iter()
        .map(|(id, title)| format!("- {id}: {title}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn findings_instruction() -> String {
    format!(
        "\
ACT AS: Senior SOC2 / NIST 800-53 Compliance Auditor.
TASK: Review the pre-filtered security log events below. Sensitive values have already been replaced with a redaction marker; do not speculate about them.
CONTROL LIBRARY (map every finding to exactly one of these IDs):
{controls}
OUTPUT: Markdown with the sections '## HIGH', '## MEDIUM' and '## LOW'. Under each section list findings as bullets in the form:
- **[CONTROL-ID] Title** -- evidence (quote the log timestamp) -- recommended remediation
If a section has no findings, write '- None observed.'",
        controls = control_library_lines()
    )
}

fn tabular_instruction() -> String {
    format!(
        "\
ACT AS: Senior SOC2 / NIST 800-53 Compliance Auditor.
TASK: Review the pre-filtered security log events below. Sensitive values have already been replaced with a redaction marker; do not speculate about them.
CONTROL LIBRARY (use only these IDs):
{controls}
OUTPUT: Markdown only. Produce exactly three sections in this order: '## HIGH', '## MEDIUM', '## LOW'.
Each section contains exactly one table with this header and no other columns:
{header}
|---|---|---|---|---|
If a section has no findings, its table must contain exactly this single row:
{fallback}
Do not add prose before, between, or after the sections.",
        controls = control_library_lines(),
        header = TABLE_HEADER,
        fallback = FALLBACK_ROW,
    )
}

/// 모델에 보낼 감사 프롬프트
///
/// 실행마다 새로 만들며 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditPrompt {
    /// 사용한 계약
    pub contract: PromptContract,
    /// 시스템 지시문
    pub system_instruction: String,
    /// 트리아지된 로그 텍스트
    pub log_data: String,
}
