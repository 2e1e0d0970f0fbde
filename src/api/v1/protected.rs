/*
 * Responsibility
 * - The one shape every protected endpoint follows:
 *   located token -> validate against the endpoint policy -> denial | success handler
 * - Handlers only supply the success payload
 */
use axum::response::{IntoResponse, Response};

use crate::services::auth::{AccessTokenValidator, ResourcePolicy, TokenInfo, Verdict};

/// Validate `token` for `policy`; on success hand the token facts to
/// `on_success`, otherwise answer with the RFC 6750 denial and nothing else.
pub async fn serve<F, R>(
    validator: &AccessTokenValidator,
    token: Option<String>,
    policy: &ResourcePolicy,
    on_success: F,
) -> Response
where
    F: FnOnce(TokenInfo) -> R,
    R: IntoResponse,
{
    match validator.validate_for(token.as_deref(), policy).await {
        Verdict::Invalid(denial) => denial.into_response(),
        Verdict::Valid(info) => {
            tracing::debug!(
                subject = ?info.subject,
                client_id = ?info.client_id,
                scopes = ?info.scopes,
                expires_at = ?info.expires_at,
                "access token accepted"
            );
            on_success(info).into_response()
        }
    }
}
