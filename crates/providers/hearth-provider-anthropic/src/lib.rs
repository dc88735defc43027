//! Anthropic (Claude) answer service for Hearth
//!
//! Sends a single user message to the Messages API and returns the text of
//! the first content block. Plain prompts are sent as a string; prompts
//! with an image are sent as an image block followed by a text block.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use hearth_core::config::{ModelConfig, DEFAULT_ANTHROPIC_BASE_URL};
use hearth_core::{AnswerRequest, AnswerService, HearthError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Messages API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicClient {
    /// Create a client against the public API with no request timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::build(api_key.into(), DEFAULT_ANTHROPIC_BASE_URL.to_string(), None)
    }

    /// Create a client from model settings
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HearthError::config("ANTHROPIC_API_KEY is not set"))?;
        Self::build(api_key, config.base_url.clone(), config.request_timeout)
    }

    fn build(api_key: String, base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(300))
            .tcp_keepalive(Duration::from_secs(60));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Point the client at a different base URL (e.g. a proxy)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Base URL in use
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message and return the answer text with token usage
    pub async fn create_message(
        &self,
        request: &AnswerRequest,
    ) -> Result<(String, Option<AnthropicUsage>)> {
        let body = AnthropicRequest::from_answer_request(request);

        let resp = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(HearthError::model(format!(
                "Anthropic API error ({}): {}",
                status, error_text
            )));
        }

        let raw = resp.text().await?;
        let parsed: AnthropicResponse = serde_json::from_str(&raw)
            .map_err(|e| HearthError::model(format!("malformed Anthropic response: {}", e)))?;

        let text = parsed
            .content
            .into_iter()
            .next()
            .and_then(|c| c.text)
            .ok_or_else(|| HearthError::model("Anthropic response contained no text"))?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                model = %request.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Anthropic call complete"
            );
        }
        Ok((text, parsed.usage))
    }
}

#[async_trait]
impl AnswerService for AnthropicClient {
    async fn generate(&self, request: AnswerRequest) -> Result<String> {
        let (text, _usage) = self.create_message(&request).await?;
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: Vec<AnthropicMessage<'a>>,
}

impl<'a> AnthropicRequest<'a> {
    fn from_answer_request(request: &'a AnswerRequest) -> Self {
        let content = match &request.image {
            Some(image) => MessageContent::Blocks(vec![
                ContentBlock::Image {
                    source: ImageSource {
                        source_type: "base64",
                        media_type: &image.media_type,
                        data: &image.data,
                    },
                },
                ContentBlock::Text {
                    text: &request.prompt,
                },
            ]),
            None => MessageContent::Text(&request.prompt),
        };
        Self {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Blocks(Vec<ContentBlock<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[allow(dead_code)]
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Token usage reported by the API
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AnthropicUsage {
    /// Prompt tokens
    pub input_tokens: usize,
    /// Completion tokens
    pub output_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::types::{AgentId, ImageAttachment};
    use hearth_core::{fallback_text, Responder, ResponderConfig};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::Arc;

    fn request(image: Option<ImageAttachment>) -> AnswerRequest {
        AnswerRequest {
            model: "claude-sonnet-4-20250514".into(),
            max_tokens: 1200,
            prompt: "Describe the damage".into(),
            image,
        }
    }

    fn ok_body(text: &str) -> String {
        json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-20250514",
            "content": [{ "type": "text", "text": text }],
            "usage": { "input_tokens": 12, "output_tokens": 34 }
        })
        .to_string()
    }

    #[test]
    fn test_text_request_shape() {
        let req = request(None);
        let body = serde_json::to_value(AnthropicRequest::from_answer_request(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1200,
                "messages": [{ "role": "user", "content": "Describe the damage" }]
            })
        );
    }

    #[test]
    fn test_image_request_shape() {
        let image = ImageAttachment::new("image/png", "aGVsbG8=").unwrap();
        let req = request(Some(image));
        let body = serde_json::to_value(AnthropicRequest::from_answer_request(&req)).unwrap();
        assert_eq!(
            body["messages"][0]["content"],
            json!([
                {
                    "type": "image",
                    "source": { "type": "base64", "media_type": "image/png", "data": "aGVsbG8=" }
                },
                { "type": "text", "text": "Describe the damage" }
            ])
        );
    }

    #[tokio::test]
    async fn test_generate_returns_first_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::Json(json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1200,
                "messages": [{ "role": "user", "content": "Describe the damage" }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ok_body("A hairline crack."))
            .create_async()
            .await;

        let client = AnthropicClient::new("test-key")
            .unwrap()
            .with_base_url(server.url());
        let (text, usage) = client.create_message(&request(None)).await.unwrap();

        assert_eq!(text, "A hairline crack.");
        assert_eq!(usage.unwrap().output_tokens, 34);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error"}}"#)
            .create_async()
            .await;

        let client = AnthropicClient::new("k").unwrap().with_base_url(server.url());
        let err = client.generate(request(None)).await.unwrap_err();
        assert!(matches!(err, HearthError::Model(_)));
        assert!(err.to_string().contains("529"));
    }

    #[tokio::test]
    async fn test_malformed_and_empty_bodies_are_errors() {
        let mut server = Server::new_async().await;
        let _garbage = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .expect(1)
            .create_async()
            .await;
        let client = AnthropicClient::new("k").unwrap().with_base_url(server.url());
        assert!(client.generate(request(None)).await.is_err());

        server.reset_async().await;
        let _empty = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(r#"{"content":[]}"#)
            .create_async()
            .await;
        assert!(client.generate(request(None)).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = AnthropicClient::new("k")
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        let err = client.generate(request(None)).await.unwrap_err();
        assert!(matches!(err, HearthError::Network(_)));
    }

    #[tokio::test]
    async fn test_responder_falls_back_on_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(500)
            .create_async()
            .await;

        let client = AnthropicClient::new("k").unwrap().with_base_url(server.url());
        let responder = Responder::new(Arc::new(client), ResponderConfig::default()).unwrap();
        let reply = responder
            .respond(AgentId::PropertyInspector, "broken window", None, &[], None)
            .await;
        assert_eq!(reply, fallback_text(AgentId::PropertyInspector, "broken window"));
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        // accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ModelConfig {
            api_key: Some("k".into()),
            base_url: format!("http://{}", addr),
            request_timeout: Some(Duration::from_millis(200)),
            ..ModelConfig::default()
        };
        let client = AnthropicClient::from_config(&config).unwrap();

        match client.generate(request(None)).await {
            Err(HearthError::Network(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }

        let text = "my landlord wants to evict me";
        let responder = Responder::new(Arc::new(client), ResponderConfig::default()).unwrap();
        let reply = responder
            .respond(AgentId::TenancyExpert, text, None, &[], None)
            .await;
        assert_eq!(reply, fallback_text(AgentId::TenancyExpert, text));
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = ModelConfig::default();
        assert!(matches!(
            AnthropicClient::from_config(&config),
            Err(HearthError::Config(_))
        ));

        let config = ModelConfig {
            api_key: Some("k".into()),
            base_url: "http://localhost:9999/v1/".into(),
            ..ModelConfig::default()
        };
        let client = AnthropicClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/v1");
    }
}
