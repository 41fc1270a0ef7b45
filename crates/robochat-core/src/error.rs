use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load context file {}: {source}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{env_var} environment variable not set\nPlease set it with: export {env_var}='your-api-key'"
    )]
    CredentialMissing { env_var: String },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Startup errors end the process; only backend errors are per-turn.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Backend(_))
    }
}

/// Failure of a single `ChatBackend::send` call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    /// Classify a transport error. `timeout` is the configured call bound,
    /// reported back when reqwest gives up.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::RateLimited(body),
            _ => Self::Provider { status, body },
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            BackendError::from_status(401, "bad key".into()),
            BackendError::Auth(_)
        ));
        assert!(matches!(
            BackendError::from_status(403, String::new()),
            BackendError::Auth(_)
        ));
        assert!(matches!(
            BackendError::from_status(429, String::new()),
            BackendError::RateLimited(_)
        ));
        assert!(matches!(
            BackendError::from_status(500, "boom".into()),
            BackendError::Provider { status: 500, .. }
        ));
    }

    #[test]
    fn credential_message_explains_fix() {
        let err = ChatError::CredentialMissing {
            env_var: "OPENAI_API_KEY".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("OPENAI_API_KEY environment variable not set"));
        assert!(msg.contains("export OPENAI_API_KEY='your-api-key'"));
        assert!(err.is_fatal());
    }

    #[test]
    fn backend_errors_are_not_fatal() {
        let err: ChatError = BackendError::Timeout(Duration::from_secs(120)).into();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "Backend error: request timed out after 120s");
    }
}
