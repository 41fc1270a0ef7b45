use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{defaults, endpoints, models};
use crate::context::{load_context, pinned_message, SessionMemory};
use crate::error::{ChatError, Result};
use crate::llm::{Backend, BackendConfig, OllamaBackend, OpenAIBackend};
use crate::session::Session;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

/// Backend settings. Fields left unset fall back to the provider's defaults
/// when they are read, so a file naming only `provider` gets that
/// provider's model, key variable and temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Ollama,
    OpenAI,
}

impl LlmProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Ollama => endpoints::OLLAMA_BASE_URL,
            Self::OpenAI => endpoints::OPENAI_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Ollama => models::OLLAMA_DEFAULT_MODEL,
            Self::OpenAI => models::OPENAI_DEFAULT_MODEL,
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Self::Ollama => "",
            Self::OpenAI => defaults::OPENAI_API_KEY_ENV,
        }
    }

    /// Ollama models keep the temperature from their Modelfile.
    pub fn default_temperature(&self) -> Option<f32> {
        match self {
            Self::Ollama => None,
            Self::OpenAI => Some(defaults::OPENAI_TEMPERATURE),
        }
    }

    pub fn default_context_file(&self) -> &'static str {
        match self {
            Self::Ollama => defaults::OLLAMA_CONTEXT_FILE,
            Self::OpenAI => defaults::OPENAI_CONTEXT_FILE,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" | "local" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => Err(ChatError::invalid_config(format!(
                "unknown provider '{other}' (expected ollama or openai)"
            ))),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl LlmSettings {
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            provider,
            model: None,
            base_url: None,
            api_key_env: None,
            temperature: None,
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature.or_else(|| self.provider.default_temperature())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url().to_string(),
            model: self.model().to_string(),
            temperature: self.temperature(),
            timeout: self.timeout(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self::for_provider(LlmProvider::default())
    }
}

/// What the conversation loop does when a backend call fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Report the error and wait for the next prompt.
    #[default]
    Continue,
    /// Report the error and end the process.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub max_window: usize,
    /// Context document. Falls back to the provider's default file.
    pub context_file: Option<PathBuf>,
    pub framing: String,
    pub on_backend_error: ErrorPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_window: defaults::MAX_WINDOW,
            context_file: None,
            framing: defaults::FRAMING.to_string(),
            on_backend_error: ErrorPolicy::default(),
        }
    }
}

impl Settings {
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            llm: LlmSettings::for_provider(provider),
            session: SessionSettings::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("robochat")
            .join("config.toml")
    }

    /// Load from the user config file, falling back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "ignoring config file: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content).map_err(|e| ChatError::invalid_config(e.to_string()))
    }

    /// Switch backend variant. Provider-specific settings are reset to the
    /// new provider's defaults; the call timeout is kept.
    pub fn set_provider(&mut self, provider: LlmProvider) {
        if self.llm.provider != provider {
            let timeout_secs = self.llm.timeout_secs;
            self.llm = LlmSettings {
                timeout_secs,
                ..LlmSettings::for_provider(provider)
            };
        }
    }

    pub fn context_path(&self) -> PathBuf {
        self.session
            .context_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.llm.provider.default_context_file()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.max_window == 0 {
            return Err(ChatError::invalid_config("session.max_window must be at least 1"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ChatError::invalid_config("llm.timeout_secs must be at least 1"));
        }
        if let Some(temperature) = self.llm.temperature() {
            if !(0.0..=defaults::MAX_TEMPERATURE).contains(&temperature) {
                return Err(ChatError::invalid_config(format!(
                    "llm.temperature must be between 0 and {}",
                    defaults::MAX_TEMPERATURE
                )));
            }
        }
        if self.llm.model().trim().is_empty() {
            return Err(ChatError::invalid_config("llm.model must not be empty"));
        }
        Ok(())
    }

    /// Get the API key from the environment variable named in settings.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolve the API key through `lookup`, which maps a variable name to
    /// its value.
    pub fn api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        let env_var = self.llm.api_key_env();
        lookup(env_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ChatError::CredentialMissing {
                env_var: env_var.to_string(),
            })
    }

    pub fn build_backend(&self) -> Result<Backend> {
        self.validate()?;
        let config = self.llm.backend_config();
        let backend = match self.llm.provider {
            LlmProvider::Ollama => Backend::Ollama(OllamaBackend::new(config)?),
            LlmProvider::OpenAI => Backend::OpenAI(OpenAIBackend::new(self.api_key()?, config)?),
        };
        Ok(backend)
    }

    /// Everything needed before the first prompt: backend, context, memory.
    pub fn build_session(&self) -> Result<Session<Backend>> {
        let backend = self.build_backend()?;
        let context = load_context(self.context_path())?;
        let memory = SessionMemory::new(
            pinned_message(&self.session.framing, &context),
            self.session.max_window,
        )?;
        tracing::info!(
            provider = backend.name(),
            model = backend.model(),
            max_window = self.session.max_window,
            "session ready"
        );
        Ok(Session::new(memory, backend, self.llm.timeout()))
    }
}
