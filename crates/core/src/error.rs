//! 에러 타입: 도메인별 에러 정의
//!
//! 트리아지 필터는 실패하지 않으므로 여기에 속하지 않습니다.
//! 모델 호출/보고서 저장 에러는 `logwarden-analyzer`에 정의됩니다.

/// Logwarden 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogwardenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// API 자격 증명 환경변수가 없거나 비어 있음
    #[error("missing credential: environment variable '{env_var}' is not set")]
    MissingCredential { env_var: String },
}
