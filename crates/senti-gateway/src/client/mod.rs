//! Remote inference client.
//!
//! The trait is the seam the orchestration service depends on; the reqwest
//! implementation lives in [`http`]. Errors stay tagged at this boundary and
//! are flattened by the service.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use senti_core::protocol::{InferenceRequest, InferenceResponse};

pub use http::HttpInferenceClient;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request encoding failed: {0}")]
    Encode(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("inference endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response decoding failed: {0}")]
    Decode(String),
}

/// Issues one inference exchange. `Ok(None)` means the backend answered
/// successfully without a body.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(
        &self,
        request: &InferenceRequest,
    ) -> Result<Option<InferenceResponse>, ClientError>;
}
