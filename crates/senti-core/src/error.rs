//! Shared error type across senti crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// The remote inference call failed.
    InferenceFailed,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InferenceFailed => "INFERENCE_FAILED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SentiError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum SentiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Any failure of the remote inference exchange, flattened.
    #[error("Error occured while analysing the request:{0}")]
    InferenceCall(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl SentiError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            SentiError::BadRequest(_) => ClientCode::BadRequest,
            SentiError::InferenceCall(_) => ClientCode::InferenceFailed,
            SentiError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            SentiError::Internal(_) => ClientCode::Internal,
        }
    }
}
