//! Gateway config loader (strict parsing).
//!
//! YAML is parsed with `deny_unknown_fields`, then `SENTI_INFERENCE_URL` and
//! `SENTI_APP_ENV` override the file values, then the result is validated.

pub mod schema;

use std::fs;

use senti_core::error::{Result, SentiError};

pub use schema::{AppSection, GatewayConfig, GatewaySection, InferenceSection};

pub const ENV_INFERENCE_URL: &str = "SENTI_INFERENCE_URL";
pub const ENV_APP_ENV: &str = "SENTI_APP_ENV";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| SentiError::Internal(format!("read config failed: {e}")))?;
    let mut cfg = parse(&s)?;
    apply_overrides(&mut cfg, |key| std::env::var(key).ok());
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg = parse(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse(s: &str) -> Result<GatewayConfig> {
    serde_yaml::from_str(s).map_err(|e| SentiError::BadRequest(format!("invalid yaml: {e}")))
}

/// Apply overrides from a key lookup (the process environment in production).
pub fn apply_overrides<F>(cfg: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_INFERENCE_URL).filter(|v| !v.trim().is_empty()) {
        cfg.inference.url = url;
    }
    if let Some(env) = lookup(ENV_APP_ENV).filter(|v| !v.trim().is_empty()) {
        cfg.app.env = env;
    }
}
