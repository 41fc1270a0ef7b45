use crate::error::BackendError;
use crate::llm::traits::*;
use crate::llm::{OllamaBackend, OpenAIBackend};
use std::time::Duration;

/// Connection parameters shared by every backend adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
    /// Unset means the provider or model default applies.
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Build the HTTP client with the call timeout applied.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, BackendError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| BackendError::InvalidRequest(format!("Failed to build HTTP client: {e}")))
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// The backend variant selected at startup.
pub enum Backend {
    Ollama(OllamaBackend),
    OpenAI(OpenAIBackend),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ollama(_) => "ollama",
            Self::OpenAI(_) => "openai",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::Ollama(b) => b.model(),
            Self::OpenAI(b) => b.model(),
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for Backend {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        match self {
            Self::Ollama(b) => b.send(messages).await,
            Self::OpenAI(b) => b.send(messages).await,
        }
    }
}

/// Check the reply a provider handed back before it reaches the session.
pub(crate) fn assistant_reply(content: Option<String>) -> Result<Message, BackendError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(Message::assistant(text)),
        Some(_) => Err(BackendError::MalformedResponse("empty reply content".into())),
        None => Err(BackendError::MalformedResponse("reply has no message".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = BackendConfig {
            base_url: "http://localhost:11434/".into(),
            model: "m".into(),
            temperature: None,
            timeout: Duration::from_secs(1),
        };
        assert_eq!(config.endpoint("/api/chat"), "http://localhost:11434/api/chat");
    }

    #[test]
    fn blank_reply_is_malformed() {
        assert!(matches!(
            assistant_reply(Some("  ".into())),
            Err(BackendError::MalformedResponse(_))
        ));
        assert!(matches!(
            assistant_reply(None),
            Err(BackendError::MalformedResponse(_))
        ));
        assert_eq!(
            assistant_reply(Some("hello".into())).unwrap(),
            Message::assistant("hello")
        );
    }
}
