//! # logwarden-analyzer
//!
//! 감사 오케스트레이션 크레이트입니다.
//! 원시 로그를 트리아지하고, 남은 이벤트를 생성형 언어 모델에 보내
//! 컴플라이언스 분석을 받은 뒤 날짜가 붙은 보고서로 저장합니다.
//!
//! # 모듈
//! - [`auditor`]: 실행 순서와 조기 종료/실패 경로 ([`Auditor`])
//! - [`prompt`]: 버전 관리되는 프롬프트 계약 ([`PromptContract`])
//! - [`model`]: 모델 클라이언트 trait ([`ModelClient`])
//! - [`gemini`]: Gemini `generateContent` 구현 ([`GeminiClient`])
//! - [`report`]: 타임스탬프 보고서 저장 ([`ReportWriter`])
//! - [`error`]: [`ServiceError`], [`AuditError`]

pub mod auditor;
pub mod error;
pub mod gemini;
pub mod model;
pub mod prompt;
pub mod report;

pub use auditor::{AuditOutcome, AuditPhase, Auditor, read_input};
pub use error::{AuditError, ServiceError};
pub use gemini::GeminiClient;
pub use model::ModelClient;
pub use prompt::{AuditPrompt, PromptContract};
pub use report::{AuditReport, ReportWriter};
