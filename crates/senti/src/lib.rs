//! Top-level facade crate for senti.
//!
//! Re-exports core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use senti_core::*;
}

pub mod gateway {
    pub use senti_gateway::*;
}
