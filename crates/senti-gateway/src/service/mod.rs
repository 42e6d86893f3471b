//! Inference orchestration: time the remote call, record metrics, return the sentiment.

use std::sync::Arc;
use std::time::Instant;

use senti_core::error::{Result, SentiError};
use senti_core::protocol::{InferenceRequest, InferenceResponse, RequestIdMetrics};

use crate::client::InferenceClient;
use crate::obs::metrics::InferenceMetrics;

pub struct InferenceService {
    client: Arc<dyn InferenceClient>,
    metrics: Arc<InferenceMetrics>,
}

impl InferenceService {
    pub fn new(client: Arc<dyn InferenceClient>, metrics: Arc<InferenceMetrics>) -> Self {
        Self { client, metrics }
    }

    pub fn metrics(&self) -> &Arc<InferenceMetrics> {
        &self.metrics
    }

    /// Forward `request` to the backend.
    ///
    /// Returns `Ok(None)` when the backend answered without a body. Every
    /// client failure is flattened into `SentiError::InferenceCall`.
    pub async fn analyse_feedback(&self, request: &InferenceRequest) -> Result<Option<String>> {
        tracing::info!(id = request.id, text = %request.text, "preparing request for inference");

        let start = Instant::now();
        let outcome = self.client.infer(request).await;
        let latency = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);

        let body = outcome.map_err(|e| {
            tracing::warn!(id = request.id, latency_ms = latency, error = %e, "inference call failed");
            SentiError::InferenceCall(e.to_string())
        })?;
        tracing::info!(latency_ms = latency, "inference latency measured");

        self.metrics.increment_request_count();

        let Some(resp) = body else {
            tracing::debug!(id = request.id, "inference endpoint returned no body");
            return Ok(None);
        };

        if let Some(corr) = RequestIdMetrics::correlate(request.id, &resp.pod_name) {
            tracing::info!(
                request_id = corr.request_id,
                pod = %corr.pod_name,
                "request processed by pod"
            );
        }

        self.record(&resp, latency);
        Ok(Some(resp.sentiment))
    }

    fn record(&self, resp: &InferenceResponse, latency: i64) {
        tracing::info!("adding inference metrics");
        // Backends that do not report RAM/cycles leave the previous values in place.
        let ram_usage = resp.ram_usage.unwrap_or_else(|| self.metrics.ram_usage());
        let cpu_cycle = resp.cpu_cycle.unwrap_or_else(|| self.metrics.cpu_cycle());
        self.metrics.update_metrics(
            latency,
            resp.feedback_score,
            resp.accuracy,
            resp.inference_time,
            ram_usage,
            cpu_cycle,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::obs::metrics::MetricsRegistry;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a fixed outcome, optionally after a delay.
    struct StubClient {
        outcome: Mutex<Option<std::result::Result<Option<InferenceResponse>, ClientError>>>,
        delay: Duration,
    }

    impl StubClient {
        fn new(outcome: std::result::Result<Option<InferenceResponse>, ClientError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl InferenceClient for StubClient {
        async fn infer(
            &self,
            _request: &InferenceRequest,
        ) -> std::result::Result<Option<InferenceResponse>, ClientError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.outcome.lock().unwrap().take().expect("stub called twice")
        }
    }

    fn response(pod: &str) -> InferenceResponse {
        InferenceResponse {
            sentiment: "positive".into(),
            feedback_score: 0.9,
            accuracy: 0.95,
            inference_time: 12.5,
            pod_name: pod.into(),
            ram_usage: None,
            cpu_cycle: None,
        }
    }

    fn service(client: StubClient) -> InferenceService {
        let registry = MetricsRegistry::new();
        let metrics = InferenceMetrics::register(&registry, "test").unwrap();
        InferenceService::new(Arc::new(client), metrics)
    }

    /// Shared sink for formatted log lines.
    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run one analysis under a scoped subscriber and return what it logged.
    async fn logged_analysis(request: InferenceRequest, pod: &str) -> String {
        let logs = LogBuf::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let svc = service(StubClient::new(Ok(Some(response(pod)))));
        let out = svc.analyse_feedback(&request).await.unwrap();
        assert_eq!(out.as_deref(), Some("positive"));

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[tokio::test]
    async fn pod_correlation_logged_for_identified_request() {
        let out = logged_analysis(InferenceRequest::new(42, "great service"), "pod-a").await;
        assert!(out.contains("adding inference metrics"));
        assert!(out.contains("request processed by pod"));
        assert!(out.contains("request_id=42"));
        assert!(out.contains("pod=pod-a"));
    }

    #[tokio::test]
    async fn anonymous_request_skips_pod_correlation() {
        let out = logged_analysis(InferenceRequest::new(0, "great service"), "pod-a").await;
        assert!(out.contains("adding inference metrics"));
        assert!(!out.contains("request processed by pod"));
    }

    #[tokio::test]
    async fn blank_pod_skips_pod_correlation() {
        let out = logged_analysis(InferenceRequest::new(42, "great service"), "   ").await;
        assert!(out.contains("adding inference metrics"));
        assert!(!out.contains("request processed by pod"));
    }

    #[tokio::test]
    async fn success_updates_gauges_and_counter() {
        let svc = service(StubClient::new(Ok(Some(response("pod-a")))));
        let out = svc
            .analyse_feedback(&InferenceRequest::new(42, "great service"))
            .await
            .unwrap();

        assert_eq!(out.as_deref(), Some("positive"));
        let m = svc.metrics();
        assert_eq!(m.feedback_score(), 0.9);
        assert_eq!(m.accuracy(), 0.95);
        assert_eq!(m.cpu_utilization(), 12.5);
        assert!(m.latency() >= 0);
        assert_eq!(m.request_count(), 1);
    }

    #[tokio::test]
    async fn latency_covers_the_remote_call() {
        let mut client = StubClient::new(Ok(Some(response(""))));
        client.delay = Duration::from_millis(30);
        let svc = service(client);

        svc.analyse_feedback(&InferenceRequest::new(0, "slow")).await.unwrap();
        assert!(svc.metrics().latency() >= 30);
    }

    #[tokio::test]
    async fn missing_resource_fields_keep_previous_values() {
        let svc = service(StubClient::new(Ok(Some(response("pod-a")))));
        svc.metrics().update_metrics(0, 0.0, 0.0, 0.0, 3.5, 99);

        svc.analyse_feedback(&InferenceRequest::new(1, "ok")).await.unwrap();
        assert_eq!(svc.metrics().ram_usage(), 3.5);
        assert_eq!(svc.metrics().cpu_cycle(), 99);
    }

    #[tokio::test]
    async fn reported_resource_fields_are_stored() {
        let mut resp = response("pod-b");
        resp.ram_usage = Some(1.25);
        resp.cpu_cycle = Some(4096);
        let svc = service(StubClient::new(Ok(Some(resp))));

        svc.analyse_feedback(&InferenceRequest::new(1, "ok")).await.unwrap();
        assert_eq!(svc.metrics().ram_usage(), 1.25);
        assert_eq!(svc.metrics().cpu_cycle(), 4096);
    }

    #[tokio::test]
    async fn absent_body_returns_none_without_touching_gauges() {
        let svc = service(StubClient::new(Ok(None)));
        let out = svc.analyse_feedback(&InferenceRequest::new(5, "hi")).await.unwrap();

        assert!(out.is_none());
        assert_eq!(svc.metrics().accuracy(), 0.0);
        assert_eq!(svc.metrics().request_count(), 1);
    }

    #[tokio::test]
    async fn client_failure_is_flattened() {
        let svc = service(StubClient::new(Err(ClientError::Transport(
            "connection refused".into(),
        ))));
        let err = svc
            .analyse_feedback(&InferenceRequest::new(5, "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, SentiError::InferenceCall(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("Error occured while analysing the request:"));
        assert!(msg.contains("connection refused"));
        assert_eq!(svc.metrics().request_count(), 0);
    }

    #[tokio::test]
    async fn status_and_decode_failures_share_one_kind() {
        for e in [
            ClientError::Status { status: 503, body: "busy".into() },
            ClientError::Decode("expected value".into()),
        ] {
            let svc = service(StubClient::new(Err(e)));
            let err = svc
                .analyse_feedback(&InferenceRequest::new(1, "x"))
                .await
                .unwrap_err();
            assert_eq!(err.client_code().as_str(), "INFERENCE_FAILED");
        }
    }
}
