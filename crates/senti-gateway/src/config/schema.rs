use serde::Deserialize;
use senti_core::error::{Result, SentiError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub inference: InferenceSection,

    #[serde(default)]
    pub app: AppSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SentiError::UnsupportedVersion);
        }

        self.inference.validate()?;
        self.app.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8501".into()
}

/// Remote inference endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceSection {
    pub url: String,

    /// Whole-request timeout. Unset means the HTTP client default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl InferenceSection {
    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(SentiError::BadRequest("inference.url must not be empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SentiError::BadRequest(
                "inference.url must start with http:// or https://".into(),
            ));
        }
        if let Some(ms) = self.timeout_ms {
            if !(100..=300_000).contains(&ms) {
                return Err(SentiError::BadRequest(
                    "inference.timeout_ms must be between 100 and 300000".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Tag value attached to every exported metric.
    #[serde(default = "default_env")]
    pub env: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self { env: default_env() }
    }
}

impl AppSection {
    pub fn validate(&self) -> Result<()> {
        if self.env.trim().is_empty() {
            return Err(SentiError::BadRequest("app.env must not be blank".into()));
        }
        Ok(())
    }
}

fn default_env() -> String {
    "local".into()
}
