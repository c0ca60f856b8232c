//! OpenAI Provider Implementation
//!
//! Speaks the OpenAI chat-completions protocol; any compatible endpoint can be
//! targeted through `base_url`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::core::llm::provider::LLMProvider;
use crate::core::llm::types::{ChatRequest, ChatResponse, LLMError, Result, TokenUsage};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider
pub struct OpenAIProvider {
    api_key: String,
    /// Sent only when configured; the API picks the limit otherwise.
    max_tokens: Option<u32>,
    organization_id: Option<String>,
    base_url: String,
    client: Client,
}

impl std::fmt::Debug for OpenAIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIProvider")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("organization_id", &self.organization_id)
            .finish_non_exhaustive()
    }
}

impl OpenAIProvider {
    pub fn new(
        api_key: String,
        max_tokens: Option<u32>,
        organization_id: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            api_key,
            max_tokens,
            organization_id,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        })
    }

    /// Provider against the public endpoint with default limits.
    pub fn with_api_key(api_key: String) -> Result<Self> {
        Self::new(api_key, None, None, None, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        match &self.organization_id {
            Some(org_id) => builder.header("OpenAI-Organization", org_id),
            None => builder,
        }
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.to_string(),
                    "content": msg.content
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Map a non-success HTTP status onto the error taxonomy.
    async fn error_for_status(resp: reqwest::Response, model: &str) -> LLMError {
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return LLMError::RateLimited {
                retry_after_secs: retry_after,
            };
        }

        let text = resp.text().await.unwrap_or_default();
        let message = api_error_message(&text);

        match status {
            reqwest::StatusCode::UNAUTHORIZED => LLMError::AuthError(message),
            reqwest::StatusCode::NOT_FOUND => LLMError::ModelNotFound(model.to_string()),
            _ => LLMError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Pull `error.message` out of an OpenAI error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_body(&request);

        log::debug!(
            "Chat completion: model={} turns={}",
            request.model,
            request.messages.len()
        );

        let start = std::time::Instant::now();
        let resp = self
            .authorized(self.client.post(&url))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;
        let latency = start.elapsed().as_millis() as u64;

        if !resp.status().is_success() {
            let err = Self::error_for_status(resp, &request.model).await;
            log::warn!("Chat completion failed ({}): {err}", err.kind());
            return Err(err);
        }

        let json: serde_json::Value = resp.json().await?;

        let first = json["choices"].as_array().and_then(|arr| arr.first());

        let content = first
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        let finish_reason = first
            .and_then(|c| c["finish_reason"].as_str())
            .map(|s| s.to_string());

        let usage = json["usage"].as_object().map(|u| TokenUsage {
            input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            output_tokens: u["completion_tokens"].as_u64().unwrap_or(0) as u32,
        });

        log::info!(
            "Chat completion ok: {} chars in {latency}ms",
            content.len()
        );

        Ok(ChatResponse {
            content,
            model: json["model"].as_str().unwrap_or(&request.model).to_string(),
            provider: "openai".to_string(),
            usage,
            finish_reason,
            latency_ms: latency,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        let resp = self.authorized(self.client.get(&url)).send().await?;

        if !resp.status().is_success() {
            return Err(Self::error_for_status(resp, "").await);
        }

        let json: serde_json::Value = resp.json().await?;
        let models = json["data"]
            .as_array()
            .ok_or_else(|| LLMError::InvalidResponse("Missing model list".to_string()))?
            .iter()
            .filter_map(|m| m["id"].as_str().map(str::to_string))
            .collect::<Vec<_>>();

        log::debug!("Listed {} models", models.len());
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::llm::types::ChatMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAIProvider {
        OpenAIProvider::new(
            "sk-test-key".to_string(),
            None,
            None,
            Some(server.uri()),
            None,
        )
        .unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest::new(
            "gpt-3.5-turbo",
            vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
        )
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-3.5-turbo-0125",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        })
    }

    #[test]
    fn test_provider_identity() {
        let provider = OpenAIProvider::with_api_key("sk-test".to_string()).unwrap();
        assert_eq!(provider.id(), "openai");
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider = OpenAIProvider::new(
            "k".into(),
            Some(10),
            None,
            Some("http://localhost:1234/v1/".into()),
            None,
        )
        .unwrap();
        assert_eq!(provider.base_url(), "http://localhost:1234/v1");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let provider = OpenAIProvider::with_api_key("sk-secret".to_string()).unwrap();
        assert!(!format!("{provider:?}").contains("sk-secret"));
    }

    #[test]
    fn test_api_error_message_extraction() {
        let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#;
        assert_eq!(api_error_message(body), "You exceeded your current quota");
        assert_eq!(api_error_message("plain"), "plain");
    }

    #[tokio::test]
    async fn test_chat_consumes_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("first")))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider_for(&server).chat(request()).await.unwrap();
        assert_eq!(response.content, "first");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage, Some(TokenUsage::new(12, 5)));
    }

    #[tokio::test]
    async fn test_chat_sends_organization_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("OpenAI-Organization", "org-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAIProvider::new(
            "sk-test-key".into(),
            None,
            Some("org-123".into()),
            Some(server.uri()),
            None,
        )
        .unwrap();
        assert_eq!(provider.chat(request()).await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn test_chat_unauthorized_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server).chat(request()).await.unwrap_err();
        match err {
            LLMError::AuthError(msg) => assert_eq!(msg, "Incorrect API key provided"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let err = provider_for(&server).chat(request()).await.unwrap_err();
        assert!(matches!(err, LLMError::RateLimited { retry_after_secs: 7 }));
    }

    #[tokio::test]
    async fn test_chat_unknown_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = provider_for(&server).chat(request()).await.unwrap_err();
        match err {
            LLMError::ModelNotFound(model) => assert_eq!(model, "gpt-3.5-turbo"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider_for(&server).chat(request()).await.unwrap_err();
        assert!(matches!(err, LLMError::ApiError { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_chat_missing_choices_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).chat(request()).await.unwrap_err();
        assert!(matches!(err, LLMError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_list_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [
                    {"id": "gpt-4o", "object": "model"},
                    {"id": "gpt-3.5-turbo", "object": "model"}
                ]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let models = provider.list_models().await.unwrap();
        assert_eq!(models, vec!["gpt-4o".to_string(), "gpt-3.5-turbo".to_string()]);
    }

    #[tokio::test]
    async fn test_list_models_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(matches!(
            provider.list_models().await,
            Err(LLMError::AuthError(_))
        ));
    }

    fn body_keys(request: &wiremock::Request) -> Vec<String> {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let mut keys: Vec<String> = body.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn test_default_body_is_model_and_messages_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .mount(&server)
            .await;

        let request = ChatRequest::new(
            "o1-mini",
            vec![ChatMessage::system("sys"), ChatMessage::user("hello")],
        );
        provider_for(&server).chat(request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(body_keys(&received[0]), ["messages", "model"]);
    }

    #[tokio::test]
    async fn test_configured_max_tokens_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({"max_tokens": 512})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            OpenAIProvider::new("sk-test-key".into(), Some(512), None, Some(server.uri()), None)
                .unwrap();
        assert_eq!(provider.chat(request()).await.unwrap().content, "ok");
    }
}
