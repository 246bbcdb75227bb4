use thiserror::Error;

/// Errors returned by Agentopia operations.
#[derive(Debug, Error)]
pub enum AgentopiaError {
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response: {0}")]
    Validation(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("signature error: {0}")]
    Signature(String),

    #[error("chain error: {0}")]
    Chain(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("timed out: {0}")]
    Timeout(String),
}

impl AgentopiaError {
    /// Map a non-2xx registry or account API status and its body to the
    /// matching error variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            404 => AgentopiaError::NotFound(body),
            409 => AgentopiaError::Conflict(body),
            _ => AgentopiaError::Http { status, body },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            AgentopiaError::NotFound(_) => Some(404),
            AgentopiaError::Conflict(_) => Some(409),
            AgentopiaError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
