//! Inference request/response shapes (JSON, camelCase on the wire).

use serde::{Deserialize, Serialize};

/// Feedback text submitted for sentiment analysis.
///
/// `id == 0` marks an anonymous request; pod correlation is skipped for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    #[serde(default)]
    pub id: i64,
    pub text: String,
    /// Optional 1-5 star rating, forwarded untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,
}

impl InferenceRequest {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            stars: None,
        }
    }

    pub fn with_stars(mut self, stars: u8) -> Self {
        self.stars = Some(stars);
        self
    }
}

/// Backend answer for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceResponse {
    pub sentiment: String,
    pub feedback_score: f64,
    pub accuracy: f64,
    /// Reported as CPU utilization on the metrics surface.
    pub inference_time: f64,
    #[serde(default)]
    pub pod_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_cycle: Option<i64>,
}

/// Correlates a caller-supplied request id with the backend pod that served it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdMetrics {
    pub request_id: i64,
    pub pod_name: String,
}

impl RequestIdMetrics {
    /// Returns `None` for anonymous requests or a blank pod name.
    pub fn correlate(request_id: i64, pod_name: &str) -> Option<Self> {
        if request_id == 0 || pod_name.trim().is_empty() {
            return None;
        }
        Some(Self {
            request_id,
            pod_name: pod_name.to_string(),
        })
    }
}

/// Decode a backend body. An empty body or a JSON `null` yields `Ok(None)`.
pub fn decode_response(body: &[u8]) -> Result<Option<InferenceResponse>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<InferenceResponse>>(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn correlate_requires_id_and_pod() {
        assert_eq!(RequestIdMetrics::correlate(0, "pod-a"), None);
        assert_eq!(RequestIdMetrics::correlate(7, ""), None);
        assert_eq!(RequestIdMetrics::correlate(7, "   "), None);

        let rec = RequestIdMetrics::correlate(42, "pod-a").unwrap();
        assert_eq!(rec.request_id, 42);
        assert_eq!(rec.pod_name, "pod-a");
    }

    #[test]
    fn request_omits_missing_stars() {
        let v = serde_json::to_value(InferenceRequest::new(42, "great service")).unwrap();
        assert_eq!(v, serde_json::json!({ "id": 42, "text": "great service" }));

        let v = serde_json::to_value(InferenceRequest::new(1, "meh").with_stars(3)).unwrap();
        assert_eq!(v["stars"], 3);
    }

    #[test]
    fn request_id_defaults_to_anonymous() {
        let req: InferenceRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(req.id, 0);
    }

    #[test]
    fn blank_or_null_body_is_absent() {
        assert!(decode_response(b"").unwrap().is_none());
        assert!(decode_response(b" \n").unwrap().is_none());
        assert!(decode_response(b"null").unwrap().is_none());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(decode_response(b"{\"sentiment\":").is_err());
        assert!(decode_response(b"{\"sentiment\":\"positive\"}").is_err());
    }
}
