/*
 * Responsibility
 * - GET/POST /api/userinfo (OpenID Connect Core 1.0 §5.3)
 * - The token must carry the userinfo scopes (default: openid) and a subject
 */
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    api::v1::{
        dto::userinfo::UserInfoResponse,
        extractors::{GetAccessToken, PostAccessToken},
        protected,
    },
    services::auth::{Denial, DenialReason, TokenInfo},
    state::AppState,
};

fn userinfo(info: TokenInfo) -> Response {
    match info.subject {
        Some(sub) => Json(UserInfoResponse { sub }).into_response(),
        // client_credentials tokens have no end-user behind them
        None => Denial::new(
            DenialReason::InvalidToken,
            "The access token is not associated with a subject.",
        )
        .into_response(),
    }
}

pub async fn get_userinfo(
    State(state): State<AppState>,
    GetAccessToken(token): GetAccessToken,
) -> Response {
    protected::serve(&state.auth, token, &state.policies.userinfo, userinfo).await
}

pub async fn post_userinfo(
    State(state): State<AppState>,
    PostAccessToken(token): PostAccessToken,
) -> Response {
    protected::serve(&state.auth, token, &state.policies.userinfo, userinfo).await
}
