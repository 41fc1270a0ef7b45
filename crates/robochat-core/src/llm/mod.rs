mod traits;
mod ollama;
mod openai;
pub mod backend;

pub use traits::*;
pub use ollama::OllamaBackend;
pub use openai::OpenAIBackend;
pub use backend::{Backend, BackendConfig};
