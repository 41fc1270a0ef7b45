// Library interface for robochat-cli.
// The binary and the integration tests both drive the loop through here.

pub mod commands;
pub mod repl;

pub use commands::{handle_command, CommandResult};
pub use repl::{ConversationLoop, Exit};
