use crate::constants::endpoints;
use crate::error::BackendError;
use crate::llm::backend::{assistant_reply, BackendConfig};
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

/// Client for the hosted OpenAI chat completions API.
pub struct OpenAIBackend {
    client: reqwest::Client,
    api_key: String,
    config: BackendConfig,
}

impl OpenAIBackend {
    pub fn new(api_key: impl Into<String>, config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: config.http_client()?,
            api_key: api_key.into(),
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[async_trait::async_trait]
impl ChatBackend for OpenAIBackend {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        let url = self.config.endpoint(endpoints::OPENAI_CHAT_PATH);

        let request_body = OpenAIRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        tracing::debug!(model = %self.config.model, messages = messages.len(), "openai chat request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let api_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| BackendError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "openai chat response"
            );
        }

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::MalformedResponse("No response from API".into()))?;

        assistant_reply(choice.message.content)
    }
}
