use crate::error::BackendError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single role-tagged chat message. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The chat backend capability: one request, one reply.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the ordered conversation (pinned system message first) and get
    /// exactly one assistant reply.
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError>;
}

#[async_trait::async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for Box<B> {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        (**self).send(messages).await
    }
}

#[async_trait::async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<B> {
    async fn send(&self, messages: &[Message]) -> Result<Message, BackendError> {
        (**self).send(messages).await
    }
}
