//! Port error model shared by every adapter.

use thiserror::Error;

pub type PortResult<T> = Result<T, PortError>;

/// Failure talking to an external collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    /// The backing service could not be reached or rejected the call.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A record was present but could not be decoded.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The adapter was misconfigured (bad identifier, missing setting).
    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

impl PortError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
