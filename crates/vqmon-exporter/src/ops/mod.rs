//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness with a UTC timestamp
//! - `/metrics` : text exposition of the registry snapshot

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use vqmon_core::exposition;

use crate::app_state::AppState;

pub async fn health() -> impl IntoResponse {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({ "status": "OK", "timestamp": timestamp }))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let encoded = state
        .registry()
        .snapshot()
        .and_then(|snap| exposition::encode(&snap));

    match encoded {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("{}: {e}", e.code().as_str()),
            )
                .into_response()
        }
    }
}
