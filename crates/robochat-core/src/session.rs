use crate::context::SessionMemory;
use crate::error::{BackendError, Result};
use crate::llm::{ChatBackend, Message, Role};
use std::time::Duration;

/// Outcome of one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// Blank input; nothing was sent.
    Skipped,
    Reply(Message),
}

/// One conversation: owns its memory and talks to a single backend.
pub struct Session<B> {
    memory: SessionMemory,
    backend: B,
    timeout: Duration,
}

impl<B: ChatBackend> Session<B> {
    pub fn new(memory: SessionMemory, backend: B, timeout: Duration) -> Self {
        Self {
            memory,
            backend,
            timeout,
        }
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drop the conversation window, keeping the pinned context.
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Run one turn: record the user's input, ask the backend, record the
    /// reply. The reply is only stored once the backend call has succeeded.
    pub async fn turn(&mut self, input: &str) -> Result<Turn> {
        if input.trim().is_empty() {
            return Ok(Turn::Skipped);
        }

        self.memory.append(Message::user(input));
        let snapshot = self.memory.snapshot();

        tracing::debug!(messages = snapshot.len(), "sending turn to backend");

        let reply = match tokio::time::timeout(self.timeout, self.backend.send(&snapshot)).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "backend call timed out");
                return Err(BackendError::Timeout(self.timeout).into());
            }
        };

        if reply.role() != Role::Assistant {
            return Err(BackendError::MalformedResponse(format!(
                "expected an assistant reply, got {:?}",
                reply.role()
            ))
            .into());
        }

        self.memory.append(reply.clone());
        Ok(Turn::Reply(reply))
    }
}
