//! Shared application state for the senti gateway.
//!
//! Wires the metrics registry, the inference metrics adapter, the HTTP
//! inference client and the orchestration service. Startup errors are
//! returned as `Result` so main can handle them without panicking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use senti_core::error::Result;

use crate::client::{HttpInferenceClient, InferenceClient};
use crate::config::GatewayConfig;
use crate::obs::metrics::{InferenceMetrics, MetricsRegistry};
use crate::service::InferenceService;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    service: Arc<InferenceService>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: Arc<MetricsRegistry>,
    draining: AtomicBool,
}

impl AppState {
    /// Build application state with the reqwest-backed client.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let client = HttpInferenceClient::new(&cfg.inference)?;
        tracing::info!(url = %client.url(), "inference client ready");
        Self::with_client(cfg, Arc::new(client))
    }

    /// Build application state around any client implementation.
    pub fn with_client(cfg: GatewayConfig, client: Arc<dyn InferenceClient>) -> Result<Self> {
        let registry = Arc::new(MetricsRegistry::new());
        let metrics = InferenceMetrics::register(&registry, &cfg.app.env)?;
        let service = Arc::new(InferenceService::new(client, metrics));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                draining: AtomicBool::new(false),
            }),
            service,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn service(&self) -> Arc<InferenceService> {
        Arc::clone(&self.service)
    }

    pub fn registry(&self) -> &MetricsRegistry {
        &self.inner.registry
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.inner.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::Relaxed)
    }
}
