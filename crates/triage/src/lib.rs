//! Logwarden 트리아지 크레이트
//!
//! 원시 로그 텍스트를 감사 대상 이벤트만 남긴, 민감 값이 제거된 텍스트로 줄입니다.
//! 외부 모델 호출 전에 실행되어 비용과 데이터 최소화 요구를 함께 통제합니다.
//!
//! # 모듈 구성
//!
//! - [`vocabulary`]: 관련성 어휘 (토큰 → [`EventCategory`](logwarden_core::EventCategory))
//! - [`redact`]: `key=value` 할당의 민감 값 마스킹
//! - [`filter`]: 라인 단위 필터링 + 마스킹 + 통계
//!
//! # 아키텍처
//!
//! ```text
//! raw text -> lines() -> Vocabulary::is_relevant -> Redactor -> Vocabulary::classify -> TriageResult
//! ```
//!
//! 이 크레이트는 I/O를 하지 않으며 에러 타입이 없습니다.
//! 매칭이 없으면 빈 결과로 표현됩니다.

pub mod filter;
pub mod redact;
pub mod vocabulary;

// --- 주요 타입 re-export ---

pub use filter::{TriageFilter, TriageResult, TriageStats, TriagedLine, triage};
pub use redact::{DEFAULT_SENSITIVE_KEYS, DEFAULT_SENTINEL, Redacted, Redactor};
pub use vocabulary::Vocabulary;
