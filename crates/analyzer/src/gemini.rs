//! Gemini `generateContent` 클라이언트
//!
//! 요청 형식:
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: <key>
//! { "systemInstruction": { "parts": [{ "text": ... }] },
//!   "contents": [{ "role": "user", "parts": [{ "text": "LOG DATA:\n..." }] }] }
//! ```
//!
//! 응답은 첫 번째 후보의 텍스트 파트를 이어 붙여 보고서 본문으로 사용합니다.
//!
//! # 에러 매핑
//! | 상황 | 에러 |
//! |------|------|
//! | 연결 실패, 타임아웃 | [`ServiceError::Transport`] |
//! | 401 / 403 | [`ServiceError::Auth`] |
//! | 429 | [`ServiceError::Quota`] |
//! | 그 외 비성공 상태 | [`ServiceError::Http`] |
//! | JSON 해석 실패 | [`ServiceError::Malformed`] |
//! | `promptFeedback.blockReason`, `finishReason = SAFETY` | [`ServiceError::Blocked`] |
//! | 텍스트 없음 | [`ServiceError::Empty`] |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use logwarden_core::config::AnalysisConfig;

use crate::error::ServiceError;
use crate::model::ModelClient;
use crate::prompt::AuditPrompt;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini 모델 클라이언트
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

impl GeminiClient {
    /// 클라이언트를 생성합니다.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// `[analysis]` 설정 섹션과 해석된 API 키로 클라이언트를 생성합니다.
    pub fn from_config(config: &AnalysisConfig, api_key: String) -> Result<Self, ServiceError> {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// `generateContent` 엔드포인트 URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn call(&self, prompt: &AuditPrompt) -> Result<String, ServiceError> {
        let url = self.endpoint();
        let body = GenerateRequest::from_prompt(prompt);

        debug!(
            model = %self.model,
            contract = prompt.contract.as_str(),
            log_bytes = prompt.log_data.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url().to_string()))?;

        if !(200..300).contains(&status) {
            let (message, code) = parse_api_error(&text, status);
            warn!(status, code = code.as_deref().unwrap_or("-"), "model service rejected request");
            return Err(match status {
                401 | 403 => ServiceError::Auth { status, message },
                429 => ServiceError::Quota(message),
                _ => ServiceError::Http { status, message },
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        parsed.into_text()
    }
}

impl ModelClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &AuditPrompt) -> Result<String, ServiceError> {
        self.call(prompt).await
    }
}

/// 에러 본문에서 메시지와 상태 코드 문자열을 꺼냅니다.
///
/// JSON이 아니면 `HTTP {status}: {body}`를 메시지로 사용합니다.
fn parse_api_error(body: &str, status: u16) -> (String, Option<String>) {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &json["error"];
        let message = error["message"]
            .as_str()
            .unwrap_or("unknown error")
            .to_owned();
        let code = error["status"].as_str().map(String::from);
        (message, code)
    } else {
        (format!("HTTP {status}: {}", body.trim()), None)
    }
}

// ─── 요청/응답 타입 ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: &AuditPrompt) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.system_instruction.clone()),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part {
                    text: Some(format!("LOG DATA:\n{}", prompt.log_data)),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, ServiceError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ServiceError::Blocked(reason));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(ServiceError::Empty);
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    Err(ServiceError::Blocked(reason.to_owned()))
                }
                _ => Err(ServiceError::Empty),
            };
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptContract;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            server.uri(),
            "gemini-2.5-flash",
            "test-key",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn prompt() -> AuditPrompt {
        PromptContract::Tabular.render("ERROR: login failed password=[REDACTED]")
    }

    fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let c = GeminiClient::new(
            "https://example.test/v1beta/",
            "gemini-2.5-flash",
            "k",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            c.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let c = GeminiClient::new("http://x", "m", "super-secret", Duration::from_secs(1)).unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("super-secret"));
    }

    #[test]
    fn from_config_uses_section_values() {
        let config = AnalysisConfig::default();
        let c = GeminiClient::from_config(&config, "k".to_owned()).unwrap();
        assert_eq!(c.model_name(), "gemini-2.5-flash");
        assert!(c.endpoint().starts_with("https://generativelanguage.googleapis.com/"));
    }

    #[test]
    fn parse_api_error_json() {
        let body = r#"{"error":{"code":400,"status":"INVALID_ARGUMENT","message":"API key not valid"}}"#;
        let (msg, code) = parse_api_error(body, 400);
        assert_eq!(msg, "API key not valid");
        assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
    }

    #[test]
    fn parse_api_error_non_json() {
        let (msg, code) = parse_api_error("Bad Gateway", 502);
        assert_eq!(msg, "HTTP 502: Bad Gateway");
        assert!(code.is_none());
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::from_prompt(&prompt())).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "LOG DATA:\nERROR: login failed password=[REDACTED]"
        );
        assert!(body["systemInstruction"].get("role").is_none());
        assert!(
            body["systemInstruction"]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Control ID")
        );
    }

    #[tokio::test]
    async fn generate_returns_concatenated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "## HIGH\n" }, { "text": "- finding" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client(&server).generate(&prompt()).await.unwrap();
        assert_eq!(text, "## HIGH\n- finding");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": { "status": "PERMISSION_DENIED", "message": "API key not valid" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        match err {
            ServiceError::Auth { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_maps_to_quota() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Quota(ref m) if m == "Quota exceeded"));
    }

    #[tokio::test]
    async fn server_error_maps_to_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[tokio::test]
    async fn block_reason_maps_to_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Blocked(ref r) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn safety_finish_without_text_maps_to_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Blocked(_)));
    }

    #[tokio::test]
    async fn blank_text_maps_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("  \n")))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Empty));
    }

    #[tokio::test]
    async fn no_candidates_maps_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client(&server).generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Empty));
    }

    #[tokio::test]
    async fn slow_service_maps_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_response("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let c = GeminiClient::new(
            server.uri(),
            "gemini-2.5-flash",
            "test-key",
            Duration::from_millis(200),
        )
        .unwrap();
        let err = c.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_transport() {
        // 바인딩 후 즉시 닫은 포트
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let c = GeminiClient::new(
            format!("http://{addr}"),
            "gemini-2.5-flash",
            "k",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = c.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
