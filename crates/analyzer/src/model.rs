//! 모델 클라이언트 trait -- 외부 생성형 언어 모델 경계
//!
//! 오케스트레이터는 [`ModelClient`]에만 의존하므로 테스트에서는
//! 네트워크 없이 고정 응답을 돌려주는 구현으로 바꿔 끼울 수 있습니다.

use std::future::Future;

use crate::error::ServiceError;
use crate::prompt::AuditPrompt;

/// 감사 프롬프트를 보내고 보고서 본문을 받는 클라이언트
///
/// 한 번의 감사 실행에서 최대 한 번 호출됩니다. 재시도는 하지 않습니다.
///
/// # 구현 예시
/// ```ignore
/// struct Canned;
///
/// impl ModelClient for Canned {
///     fn model_name(&self) -> &str { "canned" }
///
///     async fn generate(&self, _prompt: &AuditPrompt) -> Result<String, ServiceError> {
///         Ok("## HIGH\n- None observed.".to_owned())
///     }
/// }
/// ```
pub trait ModelClient: Send + Sync {
    /// 모델 식별자 (보고서 머리글에 기록)
    fn model_name(&self) -> &str;

    /// 프롬프트를 보내고 모델이 생성한 텍스트를 반환합니다.
    ///
    /// 빈 텍스트는 [`ServiceError::Empty`]로 보고해야 합니다.
    fn generate(
        &self,
        prompt: &AuditPrompt,
    ) -> impl Future<Output = Result<String, ServiceError>> + Send;
}
