//! Shared error type across skilling crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input (e.g. an unreadable identity header).
    BadRequest,
    /// Configuration could not be used.
    Config,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Config => "CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SkillingError>;

/// Unified error type used by core and web.
#[derive(Debug, Error)]
pub enum SkillingError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SkillingError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SkillingError::BadRequest(_) => ClientCode::BadRequest,
            SkillingError::Config(_) => ClientCode::Config,
            SkillingError::Internal(_) => ClientCode::Internal,
        }
    }
}
