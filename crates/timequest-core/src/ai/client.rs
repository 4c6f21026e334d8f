//! OpenAI-compatible chat-completions client.
//!
//! Sends the rendered prompt as the user turn, the expected JSON shape in the
//! system turn, and asks for a JSON object back.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::{PlannerModel, PromptRequest};
use crate::error::AiError;
use crate::storage::AiConfig;

pub struct HttpPlanner {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    messages: [CcMessage; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct CcMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl HttpPlanner {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, AiError> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| AiError::HttpClientBuild(format!("invalid base URL '{base_url}': {e}")))?
            .as_str()
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AiError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url,
            model: model.into(),
        })
    }

    /// Build from config, reading the key from the environment variable the
    /// config names.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::MissingApiKey`] if that variable is unset or empty.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey {
                var: config.api_key_env.clone(),
            })?;
        Self::new(
            &config.base_url,
            config.model.clone(),
            api_key,
            config.connect_timeout(),
            config.request_timeout(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, AiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if status != 200 {
            return Err(AiError::Status { status, body: text });
        }
        Ok(text)
    }
}

/// Pull the assistant message out of a chat-completions response and parse
/// it as a JSON object.
fn parse_completion(flow: &str, text: &str) -> Result<Value, AiError> {
    let invalid = |message: String| AiError::InvalidResponse {
        flow: flow.to_string(),
        message,
    };
    let body: Value = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("response has no message content".into()))?;
    let value: Value = serde_json::from_str(content).map_err(|e| invalid(e.to_string()))?;
    if !value.is_object() {
        return Err(invalid("expected a JSON object".into()));
    }
    Ok(value)
}

#[async_trait]
impl PlannerModel for HttpPlanner {
    async fn generate(&self, request: &PromptRequest) -> Result<Value, AiError> {
        let system = format!(
            "Respond only with a JSON object that matches this JSON Schema:\n{}",
            request.output_schema
        );
        let body = CcRequest {
            model: &self.model,
            messages: [
                CcMessage {
                    role: "system",
                    content: system,
                },
                CcMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };
        let text = self.send_json("/chat/completions", &body).await?;
        tracing::debug!(flow = request.flow, bytes = text.len(), "planner model answered");
        parse_completion(request.flow, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> PromptRequest {
        PromptRequest {
            flow: "scheduleAnalyzerFlow",
            prompt: "Analyze this".into(),
            output_schema: json!({ "type": "object" }),
        }
    }

    fn planner(url: &str) -> HttpPlanner {
        HttpPlanner::new(
            url,
            "test-model",
            "sk-test",
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn parse_completion_extracts_json_object() {
        let text = json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "{\"isGood\":true,\"feedback\":\"Nice\"}" }
            }]
        })
        .to_string();
        let value = parse_completion("f", &text).unwrap();
        assert_eq!(value["isGood"], json!(true));
    }

    #[test]
    fn parse_completion_rejects_non_objects() {
        let text = json!({ "choices": [{ "message": { "content": "[1,2]" } }] }).to_string();
        assert!(matches!(
            parse_completion("f", &text),
            Err(AiError::InvalidResponse { .. })
        ));
        let text = json!({ "choices": [] }).to_string();
        assert!(parse_completion("f", &text).is_err());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpPlanner::new(
            "not a url",
            "m",
            "k",
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .err()
        .unwrap();
        assert!(matches!(err, AiError::HttpClientBuild(_)));
    }

    #[test]
    fn from_config_requires_the_key_variable() {
        let config = AiConfig {
            api_key_env: "TIMEQUEST_TEST_KEY_THAT_IS_NEVER_SET".into(),
            ..AiConfig::default()
        };
        let err = HttpPlanner::from_config(&config).err().unwrap();
        assert!(matches!(err, AiError::MissingApiKey { .. }));
    }

    #[tokio::test]
    async fn generate_posts_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "test-model",
                "response_format": { "type": "json_object" }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{ "message": { "role": "assistant", "content": "{\"isGood\":false,\"feedback\":\"Start earlier\"}" } }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let value = planner(&server.url()).generate(&request()).await.unwrap();
        assert_eq!(value["feedback"], json!("Start earlier"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_becomes_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = planner(&server.url()).generate(&request()).await.unwrap_err();
        match err {
            AiError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
