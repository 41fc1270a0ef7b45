use crate::error::{ChatError, Result};
use crate::llm::Message;
use std::path::Path;

/// Read the startup context document. A missing or unreadable file is fatal.
pub fn load_context(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let context = std::fs::read_to_string(path).map_err(|source| ChatError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = context.len(), "loaded context");
    Ok(context)
}

/// Build the pinned system message from task framing and context text.
pub fn pinned_message(framing: &str, context: &str) -> Message {
    Message::system(format!("{}\n\n{}", framing.trim_end(), context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Role;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_resource_error() {
        let dir = TempDir::new().unwrap();
        let err = load_context(dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ChatError::ResourceLoad { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }

    #[test]
    fn reads_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.txt");
        std::fs::write(&path, "Season 1 recap").unwrap();
        assert_eq!(load_context(&path).unwrap(), "Season 1 recap");
    }

    #[test]
    fn pinned_message_joins_with_blank_line() {
        let msg = pinned_message("Answer questions.\n", "episode notes");
        assert_eq!(msg.role(), Role::System);
        assert_eq!(msg.content(), "Answer questions.\n\nepisode notes");
    }
}
