use crate::constants::endpoints;
use crate::error::BackendError;
use crate::llm::backend::{assistant_reply, BackendConfig};
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for a local Ollama service. No credential required.
pub struct OllamaBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl OllamaBackend {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: config.http_client()?,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: Option<String>,
}

#[async_trait::async_trait]
impl ChatBackend for OllamaBackend {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        let url = self.config.endpoint(endpoints::OLLAMA_CHAT_PATH);
        let request_body = OllamaRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: self
                .config
                .temperature
                .map(|temperature| OllamaOptions { temperature }),
        };

        tracing::debug!(model = %self.config.model, messages = messages.len(), "ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, self.config.timeout))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(e, self.config.timeout))?;

        if !status.is_success() {
            return Err(BackendError::from_status(status.as_u16(), response_text));
        }

        let api_response: OllamaResponse = serde_json::from_str(&response_text)
            .map_err(|e| BackendError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        tracing::debug!(
            prompt_tokens = ?api_response.prompt_eval_count,
            completion_tokens = ?api_response.eval_count,
            "ollama chat response"
        );

        assistant_reply(api_response.message.and_then(|m| m.content))
    }
}
