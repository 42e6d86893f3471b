//! In-process observability.
//!
//! Meters are stored as atomics and rendered by the `/metrics` handler.

pub mod metrics;
