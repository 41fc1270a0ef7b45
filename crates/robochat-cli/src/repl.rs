use anyhow::Result;
use robochat_core::constants::ui::PROMPT;
use robochat_core::{ChatBackend, ErrorPolicy, Session, Turn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::commands::{handle_command, CommandResult};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Input closed (Ctrl-D or end of piped input).
    EndOfInput,
    /// User asked to quit.
    Quit,
    /// Interrupted by a signal while waiting for input or a reply.
    Interrupted,
    /// A backend call failed under `ErrorPolicy::Abort`.
    BackendFailure,
}

impl Exit {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::BackendFailure)
    }
}

/// Line-oriented terminal driver around a `Session`.
pub struct ConversationLoop<B> {
    session: Session<B>,
    policy: ErrorPolicy,
}

impl<B: ChatBackend> ConversationLoop<B> {
    pub fn new(session: Session<B>, policy: ErrorPolicy) -> Self {
        Self { session, policy }
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    /// Prompt, read a line, run the turn, print the reply; repeat until the
    /// input ends or the user quits. Replies go to `out`, errors to `err`.
    pub async fn run<R, W, E>(&mut self, input: R, out: &mut W, err: &mut E) -> Result<Exit>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        loop {
            out.write_all(PROMPT.as_bytes()).await?;
            out.flush().await?;

            let Some(line) = lines.next_line().await? else {
                out.write_all(b"\n").await?;
                out.flush().await?;
                return Ok(Exit::EndOfInput);
            };

            match handle_command(&line) {
                CommandResult::NotACommand => {}
                CommandResult::Quit => return Ok(Exit::Quit),
                CommandResult::Clear => {
                    self.session.reset();
                    write_line(out, "Conversation cleared.").await?;
                    continue;
                }
                CommandResult::ShowHistory => {
                    let memory = self.session.memory();
                    let summary = format!(
                        "{} of {} messages in memory (plus pinned context)",
                        memory.len(),
                        memory.max_window()
                    );
                    write_line(out, &summary).await?;
                    continue;
                }
                CommandResult::Message(text) => {
                    write_line(out, &text).await?;
                    continue;
                }
            }

            match self.session.turn(&line).await {
                Ok(Turn::Skipped) => {}
                Ok(Turn::Reply(reply)) => write_line(out, reply.content()).await?,
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("turn failed: {e}");
                    write_line(err, &format!("Error: {e}")).await?;
                    if self.policy == ErrorPolicy::Abort {
                        return Ok(Exit::BackendFailure);
                    }
                }
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(w: &mut W, text: &str) -> std::io::Result<()> {
    w.write_all(text.as_bytes()).await?;
    w.write_all(b"\n").await?;
    w.flush().await
}
