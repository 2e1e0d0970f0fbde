/*
 * Responsibility
 * - GET/POST /api/time: current UTC time for any holder of a valid token
 * - GET takes the token from the header or ?access_token=, POST from the header or the form body
 */
use axum::{Json, extract::State, response::Response};

use crate::{
    api::v1::{
        dto::time::TimeResponse,
        extractors::{GetAccessToken, PostAccessToken},
        protected,
    },
    state::AppState,
};

pub async fn get_time(
    State(state): State<AppState>,
    GetAccessToken(token): GetAccessToken,
) -> Response {
    protected::serve(&state.auth, token, &state.policies.time, |_| {
        Json(TimeResponse::now())
    })
    .await
}

pub async fn post_time(
    State(state): State<AppState>,
    PostAccessToken(token): PostAccessToken,
) -> Response {
    protected::serve(&state.auth, token, &state.policies.time, |_| {
        Json(TimeResponse::now())
    })
    .await
}
