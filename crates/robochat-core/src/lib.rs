pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;

// Re-export key types
pub use config::{ErrorPolicy, Settings};
pub use context::SessionMemory;
pub use error::{BackendError, ChatError};
pub use llm::{Backend, ChatBackend, Message, OllamaBackend, OpenAIBackend, Role};
pub use session::{Session, Turn};
