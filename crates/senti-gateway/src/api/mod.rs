//! Public HTTP API.
//!
//! `POST /api/v1/feedback` relays a feedback text to the inference backend and
//! answers with the sentiment as plain text. Errors are rendered as
//! `{ "code", "message" }` JSON keyed by the stable client code.

pub mod feedback;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use senti_core::error::{ClientCode, SentiError};

/// HTTP wrapper for `SentiError`.
#[derive(Debug)]
pub struct ApiError(pub SentiError);

impl From<SentiError> for ApiError {
    fn from(e: SentiError) -> Self {
        Self(e)
    }
}

fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::InferenceFailed => StatusCode::BAD_GATEWAY,
        ClientCode::UnsupportedVersion | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let body = json!({
            "code": code.as_str(),
            "message": self.0.to_string(),
        });
        (status_for(code), Json(body)).into_response()
    }
}
