/*
 * Responsibility
 * - Read the Authorization header / query string / form body off the request
 * - Delegate header parsing and precedence to services::auth::authorization
 * - Body read failures become AppError (400 / 413); token problems never do
 */
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};

use crate::error::AppError;
use crate::services::auth::authorization;

use super::types::{ACCESS_TOKEN_PARAM, GetAccessToken, PostAccessToken};

fn header_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    authorization::extract_access_token(raw)
}

fn find_parameter(encoded: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == ACCESS_TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

pub fn locate_for_get(parts: &Parts) -> Option<String> {
    let parameter = parts
        .uri
        .query()
        .and_then(|q| find_parameter(q.as_bytes()));

    authorization::locate(header_token(&parts.headers), parameter)
}

/// The body is read to completion before the parameter lookup, whatever the
/// header says.
pub async fn locate_for_post<S>(req: Request, state: &S) -> Result<Option<String>, AppError>
where
    S: Send + Sync,
{
    let from_header = header_token(req.headers());
    let is_form = is_form_urlencoded(req.headers());

    let body = Bytes::from_request(req, state).await.map_err(|rejection| {
        tracing::debug!(error = %rejection, "failed to read request body");
        if rejection.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::bad_request("INVALID_BODY", rejection.body_text())
        }
    })?;

    let parameter = if is_form { find_parameter(&body) } else { None };

    Ok(authorization::locate(from_header, parameter))
}

impl<S> FromRequestParts<S> for GetAccessToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(GetAccessToken(locate_for_get(parts)))
    }
}

impl<S> FromRequest<S> for PostAccessToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        locate_for_post(req, state).await.map(PostAccessToken)
    }
}
