use crate::error::{ChatError, Result};
use crate::llm::Message;
use std::collections::VecDeque;

/// Conversation memory: one pinned system message plus a bounded window of
/// the most recent messages.
///
/// The pinned message sits outside the window. It is not counted against
/// `max_window` and is never evicted.
#[derive(Debug, Clone)]
pub struct SessionMemory {
    pinned: Message,
    window: VecDeque<Message>,
    max_window: usize,
}

impl SessionMemory {
    pub fn new(pinned: Message, max_window: usize) -> Result<Self> {
        if max_window == 0 {
            return Err(ChatError::invalid_config(
                "session window size must be at least 1",
            ));
        }
        Ok(Self {
            pinned,
            window: VecDeque::with_capacity(max_window + 1),
            max_window,
        })
    }

    /// Append to the end of the window, evicting the oldest messages until
    /// the window is back within bounds.
    pub fn append(&mut self, message: Message) {
        self.window.push_back(message);
        while self.window.len() > self.max_window {
            self.window.pop_front();
        }
    }

    /// Point-in-time copy of the conversation: pinned message first, then
    /// the window in chronological order.
    pub fn snapshot(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.window.len() + 1);
        messages.push(self.pinned.clone());
        messages.extend(self.window.iter().cloned());
        messages
    }

    pub fn pinned(&self) -> &Message {
        &self.pinned
    }

    /// Window messages only.
    pub fn window(&self) -> impl Iterator<Item = &Message> {
        self.window.iter()
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }

    /// Number of messages in the window; the pinned message is not counted.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.window.back()
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(max: usize) -> SessionMemory {
        SessionMemory::new(Message::system("ctx"), max).unwrap()
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = SessionMemory::new(Message::system("ctx"), 0).unwrap_err();
        assert!(matches!(err, ChatError::InvalidConfig(_)));
    }

    #[test]
    fn bound_of_three_keeps_last_three() {
        let mut mem = memory(3);
        mem.append(Message::user("U1"));
        mem.append(Message::assistant("A1"));
        mem.append(Message::user("U2"));
        mem.append(Message::assistant("A2"));

        assert_eq!(
            mem.snapshot(),
            vec![
                Message::system("ctx"),
                Message::assistant("A1"),
                Message::user("U2"),
                Message::assistant("A2"),
            ]
        );
    }

    #[test]
    fn window_of_one() {
        let mut mem = memory(1);
        mem.append(Message::user("a"));
        mem.append(Message::user("b"));
        assert_eq!(mem.len(), 1);
        assert_eq!(mem.last_message(), Some(&Message::user("b")));
    }

    #[test]
    fn clear_keeps_pinned() {
        let mut mem = memory(4);
        mem.append(Message::user("a"));
        mem.clear();
        assert!(mem.is_empty());
        assert_eq!(mem.snapshot(), vec![Message::system("ctx")]);
    }
}
