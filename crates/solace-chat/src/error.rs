//! Error types for the conversational core.

use solace_storage::StoreError;

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    /// A prompt cannot be built from zero turns.
    #[error("conversation has no turns")]
    EmptyConversation,
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The exchange task panicked or was cancelled by the runtime.
    #[error("chat exchange did not complete: {0}")]
    Interrupted(String),
}

/// Failure of a call to the hosted language model.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Auth, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimit, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Server, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message)
    }

    /// Classify a transport-level reqwest failure.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err))
        } else {
            Self::network(format!("Request failed: {}", err))
        }
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, message: &str) -> Self {
        match status {
            400 | 404 => Self::invalid_request(format!("Invalid request: {}", message)),
            401 | 403 => Self::auth(format!("Authentication failed: {}", message)),
            429 => Self::rate_limit(format!("Quota exceeded: {}", message)),
            500..=599 => Self::server(format!("Server error: {}", message)),
            _ => Self::server(format!("HTTP {}: {}", status, message)),
        }
    }
}

/// Classification of provider failures, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Timeout,
    Network,
    Auth,
    RateLimit,
    Server,
    InvalidRequest,
    /// The provider answered 2xx but the body was unusable.
    MalformedResponse,
}
