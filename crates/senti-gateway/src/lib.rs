//! senti gateway library entry.
//!
//! Wires config, metrics, the remote inference client and the orchestration
//! service behind an axum router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod service;
