use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use senti_core::error::SentiError;
use senti_core::protocol::InferenceRequest;

use super::ApiError;
use crate::app_state::AppState;

pub async fn analyse(
    State(app): State<AppState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| SentiError::BadRequest(e.body_text()))?;

    match app.service().analyse_feedback(&req).await? {
        Some(sentiment) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            sentiment,
        )
            .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
