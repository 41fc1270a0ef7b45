/// robochat — centralized constants.
/// Default models, endpoints and session limits live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    /// Custom Ollama model tuned on the show.
    pub const OLLAMA_DEFAULT_MODEL: &str = "mr_robot_v2";
    pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

    pub const OLLAMA_CHAT_PATH: &str = "/api/chat";
    pub const OPENAI_CHAT_PATH: &str = "/v1/chat/completions";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const MAX_WINDOW: usize = 20;
    pub const TIMEOUT_SECS: u64 = 120;
    pub const OPENAI_TEMPERATURE: f32 = 0.2;
    pub const MAX_TEMPERATURE: f32 = 2.0;
    pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

    pub const OLLAMA_CONTEXT_FILE: &str = "data/mr_robot_all_episodes_summary.txt";
    pub const OPENAI_CONTEXT_FILE: &str = "data/mr_robot_wiki.txt";

    pub const FRAMING: &str = "You are a specialist in the Mr Robot TV series and capable of answering questions about this show.\n\nHere is context about all episodes:";
}

// ─── Terminal ─────────────────────────────────────────────────────────────────

pub mod ui {
    pub const PROMPT: &str = "prompt> ";
}
