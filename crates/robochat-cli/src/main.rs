use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use robochat_cli::{ConversationLoop, Exit};
use robochat_core::config::LlmProvider;
use robochat_core::Settings;

#[derive(Parser)]
#[command(name = "robochat")]
#[command(about = "robochat - ask an LLM about the Mr Robot TV series")]
#[command(version)]
struct Cli {
    /// LLM provider (ollama, openai)
    #[arg(short, long)]
    provider: Option<LlmProvider>,

    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Context document pinned at the start of the conversation
    #[arg(short, long)]
    context: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of recent messages kept besides the pinned context
    #[arg(long)]
    max_window: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = match cli.config {
        Some(ref path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Settings::load(),
    };

    if let Some(provider) = cli.provider {
        settings.set_provider(provider);
    }
    if let Some(model) = cli.model {
        settings.llm.model = Some(model);
    }
    if let Some(context) = cli.context {
        settings.session.context_file = Some(context);
    }
    if let Some(max_window) = cli.max_window {
        settings.session.max_window = max_window;
    }

    let session = settings.build_session()?;
    let mut repl = ConversationLoop::new(session, settings.session.on_backend_error);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut stderr = tokio::io::stderr();

    let exit = tokio::select! {
        result = repl.run(stdin, &mut stdout, &mut stderr) => result?,
        _ = tokio::signal::ctrl_c() => Exit::Interrupted,
    };

    if exit == Exit::Interrupted {
        // A pending stdin read would hold up runtime shutdown.
        println!();
        std::process::exit(0);
    }

    Ok(if exit.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
