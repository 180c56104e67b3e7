//! 설정 관리: logwarden.toml 파싱 및 런타임 설정
//!
//! [`LogwardenConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGWARDEN_ANALYSIS_MODEL=gemini-2.5-pro` 형식)
//! 3. 설정 파일 (`logwarden.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! API 키는 설정 파일에 저장하지 않습니다. `analysis.api_key_env`가 가리키는
//! 환경변수에서만 읽습니다 ([`AnalysisConfig::resolve_api_key`]).
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logwarden_core::error::LogwardenError> {
//! use logwarden_core::config::LogwardenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogwardenConfig::load("logwarden.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogwardenConfig::parse("[analysis]\nprompt_contract = \"findings\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, LogwardenError};
use crate::types::EventCategory;

/// 지원하는 프롬프트 계약 이름
pub const PROMPT_CONTRACTS: [&str; 3] = ["narrative", "findings", "tabular"];

/// Logwarden 통합 설정
///
/// `logwarden.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogwardenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 트리아지 정책 (관련성 어휘, 민감 키)
    #[serde(default)]
    pub triage: TriageConfig,
    /// 모델 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 감사 입력 설정
    #[serde(default)]
    pub audit: AuditConfig,
    /// 보고서 출력 설정
    #[serde(default)]
    pub report: ReportConfig,
}

impl LogwardenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogwardenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작하는 [`load`](Self::load) 변형입니다.
    ///
    /// CLI에서 기본 경로(`logwarden.toml`)를 명시하지 않았을 때 사용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LogwardenError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(LogwardenError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogwardenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogwardenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogwardenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogwardenError> {
        toml::from_str(toml_str).map_err(|e| {
            LogwardenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGWARDEN_{SECTION}_{FIELD}`
    /// 예: `LOGWARDEN_REPORT_OUTPUT_DIR=/var/audit`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGWARDEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGWARDEN_GENERAL_LOG_FORMAT");

        // Triage
        override_string(&mut self.triage.sentinel, "LOGWARDEN_TRIAGE_SENTINEL");
        override_csv(
            &mut self.triage.sensitive_keys,
            "LOGWARDEN_TRIAGE_SENSITIVE_KEYS",
        );

        // Analysis
        override_string(&mut self.analysis.model, "LOGWARDEN_ANALYSIS_MODEL");
        override_string(
            &mut self.analysis.api_key_env,
            "LOGWARDEN_ANALYSIS_API_KEY_ENV",
        );
        override_string(&mut self.analysis.base_url, "LOGWARDEN_ANALYSIS_BASE_URL");
        override_string(
            &mut self.analysis.prompt_contract,
            "LOGWARDEN_ANALYSIS_PROMPT_CONTRACT",
        );
        override_u64(
            &mut self.analysis.timeout_secs,
            "LOGWARDEN_ANALYSIS_TIMEOUT_SECS",
        );

        // Audit
        override_string(&mut self.audit.input_path, "LOGWARDEN_AUDIT_INPUT_PATH");

        // Report
        override_string(&mut self.report.output_dir, "LOGWARDEN_REPORT_OUTPUT_DIR");
        override_string(&mut self.report.file_prefix, "LOGWARDEN_REPORT_FILE_PREFIX");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogwardenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.triage.sentinel.trim().is_empty() {
            return Err(invalid("triage.sentinel", "must not be empty".to_owned()));
        }

        // 공백이나 따옴표가 있으면 재마스킹 시 값 경계가 달라짐
        if self
            .triage
            .sentinel
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'')
        {
            return Err(invalid(
                "triage.sentinel",
                "must not contain whitespace or quotes".to_owned(),
            ));
        }

        if self.triage.sensitive_keys.is_empty() {
            return Err(invalid(
                "triage.sensitive_keys",
                "at least one sensitive key is required".to_owned(),
            ));
        }

        // 키는 식별자 문자만 허용 (매칭 시 세그먼트 경계로 사용)
        if let Some(bad) = self.triage.sensitive_keys.iter().find(|k| {
            k.is_empty() || !k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }) {
            return Err(invalid(
                "triage.sensitive_keys",
                format!("'{bad}' must be a non-empty alphanumeric identifier"),
            ));
        }

        if self.triage.replace_default_vocabulary && self.triage.vocabulary.is_empty() {
            return Err(invalid(
                "triage.vocabulary",
                "must not be empty when replace_default_vocabulary is set".to_owned(),
            ));
        }

        if let Some(token) = self.triage.vocabulary.keys().find(|t| t.trim().is_empty()) {
            return Err(invalid(
                "triage.vocabulary",
                format!("token '{token}' must not be blank"),
            ));
        }

        if self.analysis.model.trim().is_empty() {
            return Err(invalid("analysis.model", "must not be empty".to_owned()));
        }

        if self.analysis.api_key_env.trim().is_empty() {
            return Err(invalid(
                "analysis.api_key_env",
                "must name an environment variable".to_owned(),
            ));
        }

        if !PROMPT_CONTRACTS.contains(&self.analysis.prompt_contract.as_str()) {
            return Err(invalid(
                "analysis.prompt_contract",
                format!("must be one of: {}", PROMPT_CONTRACTS.join(", ")),
            ));
        }

        if self.analysis.timeout_secs == 0 {
            return Err(invalid(
                "analysis.timeout_secs",
                "must be greater than zero".to_owned(),
            ));
        }

        if self.audit.input_path.trim().is_empty() {
            return Err(invalid("audit.input_path", "must not be empty".to_owned()));
        }

        if self.report.file_prefix.trim().is_empty()
            || self.report.file_prefix.contains(['/', '\\'])
        {
            return Err(invalid(
                "report.file_prefix",
                "must be a non-empty file name without path separators".to_owned(),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> LogwardenError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason,
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 트리아지 정책 설정
///
/// 관련성 어휘와 민감 키는 제어 흐름이 아닌 데이터로 관리합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// 민감 값 대체 문자열
    pub sentinel: String,
    /// 민감 키 목록 (대소문자 무시)
    pub sensitive_keys: Vec<String>,
    /// true면 기본 어휘를 버리고 `vocabulary`만 사용
    pub replace_default_vocabulary: bool,
    /// 추가 관련성 토큰 → 분류
    pub vocabulary: BTreeMap<String, EventCategory>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            sentinel: "[REDACTED]".to_owned(),
            sensitive_keys: ["password", "passwd", "token", "key"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            replace_default_vocabulary: false,
            vocabulary: BTreeMap::new(),
        }
    }
}

/// 모델 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 모델 이름
    pub model: String,
    /// API 키를 담은 환경변수 이름
    pub api_key_env: String,
    /// API 기본 URL
    pub base_url: String,
    /// 프롬프트 계약 (narrative, findings, tabular)
    pub prompt_contract: String,
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl AnalysisConfig {
    /// 환경변수에서 API 키를 읽습니다.
    ///
    /// 변수가 없거나 공백뿐이면 [`ConfigError::MissingCredential`]을 반환합니다.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(val) if !val.trim().is_empty() => Ok(val.trim().to_owned()),
            _ => Err(ConfigError::MissingCredential {
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_owned(),
            api_key_env: "GEMINI_API_KEY".to_owned(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_owned(),
            prompt_contract: "tabular".to_owned(),
            timeout_secs: 120,
        }
    }
}

/// 감사 입력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// 원시 로그 파일 경로
    pub input_path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            input_path: "system_logs.txt".to_owned(),
        }
    }
}

/// 보고서 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 보고서 디렉토리
    pub output_dir: String,
    /// 보고서 파일 이름 접두사
    pub file_prefix: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_owned(),
            file_prefix: "Audit_Report".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
