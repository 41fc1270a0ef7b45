mod memory;
pub mod loader;

pub use memory::SessionMemory;
pub use loader::{load_context, pinned_message};
