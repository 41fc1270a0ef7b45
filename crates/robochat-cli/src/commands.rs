/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Drop the conversation window, keep the pinned context.
    Clear,
    /// Quit the application.
    Quit,
    /// Report how full the conversation window is.
    ShowHistory,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return CommandResult::NotACommand;
    }

    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" | "/new" => CommandResult::Clear,
        "/history" => CommandResult::ShowHistory,
        "/version" => CommandResult::Message(format!("robochat v{}", env!("CARGO_PKG_VERSION"))),
        _ => CommandResult::NotACommand,
    }
}

fn show_help() -> CommandResult {
    CommandResult::Message(
        "robochat commands:
  /help, /h          Show this help
  /clear, /new       Start over (keeps the show context)
  /history           Show how many messages are remembered
  /version           Show version
  /exit, /quit, /q   Quit

Anything else is sent to the model. Ctrl-D also quits."
            .to_string(),
    )
}
