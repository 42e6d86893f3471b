//! Protocol modules.
//!
//! Wire formats exchanged with the remote inference backend. Decoding is
//! panic-free: malformed bodies surface as errors, never as panics.

pub mod inference;

pub use inference::{decode_response, InferenceRequest, InferenceResponse, RequestIdMetrics};
