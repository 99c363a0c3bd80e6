use std::fmt;
use thiserror::Error;

/// What went wrong while talking to the assistant service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// The question was rejected before any request was sent
    InvalidRequest,
    /// Connection, TLS or body-transfer failure
    Transport,
    /// The service answered with a non-success HTTP status
    Status(u16),
    /// The body could not be parsed or carried no answer text
    Malformed,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::InvalidRequest => write!(f, "invalid request"),
            ServiceErrorKind::Transport => write!(f, "network error"),
            ServiceErrorKind::Status(code) => write!(f, "service error (HTTP {})", code),
            ServiceErrorKind::Malformed => write!(f, "malformed response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InvalidRequest, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Transport, message)
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Status(code), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Malformed, message)
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ServiceErrorKind::Transport
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::malformed(err.to_string())
        } else {
            ServiceError::transport(err.to_string())
        }
    }
}
