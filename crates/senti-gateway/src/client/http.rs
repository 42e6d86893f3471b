use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use senti_core::error::{Result, SentiError};
use senti_core::protocol::{decode_response, InferenceRequest, InferenceResponse};

use super::{ClientError, InferenceClient};
use crate::config::InferenceSection;

/// Longest error body echoed back in `ClientError::Status`.
const MAX_ERROR_BODY: usize = 512;

/// reqwest-backed client posting JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    client: Client,
    url: String,
}

impl HttpInferenceClient {
    pub fn new(cfg: &InferenceSection) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = cfg.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| SentiError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self::with_client(client, cfg.url.clone()))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn infer(
        &self,
        request: &InferenceRequest,
    ) -> std::result::Result<Option<InferenceResponse>, ClientError> {
        let body = serde_json::to_vec(request).map_err(|e| ClientError::Encode(e.to_string()))?;

        let resp = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let mut text = String::from_utf8_lossy(&bytes).into_owned();
            if text.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !text.is_char_boundary(cut) {
                    cut -= 1;
                }
                text.truncate(cut);
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_response(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
