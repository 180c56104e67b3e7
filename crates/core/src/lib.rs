//! Logwarden 공통 크레이트
//!
//! 모든 크레이트가 공유하는 설정, 에러, 도메인 타입을 정의합니다.
//!
//! - [`config`]: `logwarden.toml` 파싱, 환경변수 오버라이드, 유효성 검증
//! - [`error`]: 최상위 에러 및 설정 에러
//! - [`types`]: 보안 이벤트 분류 ([`EventCategory`])

pub mod config;
pub mod error;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LogwardenError};

// 설정
pub use config::LogwardenConfig;

// 도메인 타입
pub use types::EventCategory;
