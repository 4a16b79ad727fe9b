use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness only; never touches the provider or recency state.
#[axum::debug_handler]
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
