/*
 * Responsibility
 * - GET /health (liveness, no token required)
 * - Reports which introspection backend the server validates against
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "introspection": state.auth.backend_name(),
        })),
    )
}
