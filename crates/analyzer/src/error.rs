//! 감사 오케스트레이션 에러 타입
//!
//! - [`ServiceError`]: 외부 모델 호출 실패 (인증, 네트워크, 할당량, 응답 형식, 안전 필터)
//! - [`AuditError`]: 한 번의 감사 실행을 종료시키는 실패
//!
//! 트리아지 결과가 비어 있는 경우는 에러가 아니며
//! [`AuditOutcome::NothingToAnalyze`](crate::auditor::AuditOutcome)로 표현됩니다.

use std::path::PathBuf;

/// 외부 모델 호출 에러
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// 연결/전송 실패 (DNS, TLS, 타임아웃 등)
    #[error("transport error: {0}")]
    Transport(String),

    /// 인증 실패 (401/403)
    #[error("authentication rejected (HTTP {status}): {message}")]
    Auth {
        /// HTTP 상태 코드
        status: u16,
        /// 서비스가 보낸 메시지
        message: String,
    },

    /// 요청 할당량 초과 (429)
    #[error("quota exceeded: {0}")]
    Quota(String),

    /// 그 외 HTTP 에러
    #[error("service returned HTTP {status}: {message}")]
    Http {
        /// HTTP 상태 코드
        status: u16,
        /// 서비스가 보낸 메시지
        message: String,
    },

    /// 응답 본문을 해석할 수 없음
    #[error("malformed response: {0}")]
    Malformed(String),

    /// 안전 필터 등으로 응답이 차단됨
    #[error("response blocked: {0}")]
    Blocked(String),

    /// 응답에 텍스트가 없음
    #[error("model returned no text")]
    Empty,
}

/// 감사 실행 에러
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// 입력 로그 파일 없음
    #[error("input log file not found: {}", path.display())]
    InputMissing {
        /// 찾지 못한 경로
        path: PathBuf,
    },

    /// 입력 파일 읽기 실패 (권한, 인코딩 등)
    #[error("failed to read input {}: {source}", path.display())]
    Input {
        /// 입력 경로
        path: PathBuf,
        /// 원인
        source: std::io::Error,
    },

    /// 모델 호출 실패
    #[error("analysis failed: {0}")]
    Service(#[from] ServiceError),

    /// 보고서 저장 실패
    #[error("failed to write report {}: {source}", path.display())]
    Persistence {
        /// 쓰려던 경로
        path: PathBuf,
        /// 원인
        source: std::io::Error,
    },
}
