//! RFC 6750 §3 denial responses.
//!
//! The validator only decides *why* a request is denied; this module owns the
//! mapping from reason to status code, `WWW-Authenticate` challenge and body.
//!
//! | reason                 | status | `error`              |
//! |------------------------|--------|----------------------|
//! | `MissingToken`         | 401    | (none)               |
//! | `InvalidToken`         | 401    | `invalid_token`      |
//! | `InsufficientScope`    | 403    | `insufficient_scope` |
//! | `SubjectMismatch`      | 401    | `invalid_token`      |
//! | `AuthorityUnavailable` | 401    | `invalid_token`      |

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingToken,
    InvalidToken,
    InsufficientScope,
    SubjectMismatch,
    AuthorityUnavailable,
}

impl DenialReason {
    pub fn status(self) -> StatusCode {
        match self {
            Self::InsufficientScope => StatusCode::FORBIDDEN,
            Self::MissingToken
            | Self::InvalidToken
            | Self::SubjectMismatch
            | Self::AuthorityUnavailable => StatusCode::UNAUTHORIZED,
        }
    }

    /// RFC 6750 §3.1 error code. A request without a token gets none.
    pub fn error_code(self) -> Option<&'static str> {
        match self {
            Self::MissingToken => None,
            Self::InsufficientScope => Some("insufficient_scope"),
            Self::InvalidToken | Self::SubjectMismatch | Self::AuthorityUnavailable => {
                Some("invalid_token")
            }
        }
    }
}

/// Why a request was refused, plus what the client should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub description: Option<String>,
    // Space-delimited scopes required by the resource (insufficient_scope only).
    pub scope: Option<String>,
}

impl Denial {
    pub fn missing_token() -> Self {
        Self {
            reason: DenialReason::MissingToken,
            description: None,
            scope: None,
        }
    }

    pub fn new(reason: DenialReason, description: impl Into<String>) -> Self {
        Self {
            reason,
            description: Some(description.into()),
            scope: None,
        }
    }

    pub fn insufficient_scope(description: impl Into<String>, required: &[String]) -> Self {
        Self {
            reason: DenialReason::InsufficientScope,
            description: Some(description.into()),
            scope: (!required.is_empty()).then(|| required.join(" ")),
        }
    }

    /// `WWW-Authenticate` value: `Bearer` alone, or
    /// `Bearer error="..", error_description=".."[, scope=".."]`.
    pub fn challenge(&self) -> String {
        let Some(code) = self.reason.error_code() else {
            return "Bearer".to_string();
        };

        let mut value = format!("Bearer error=\"{code}\"");
        if let Some(description) = self.description.as_deref().map(sanitize) {
            if !description.is_empty() {
                value.push_str(&format!(", error_description=\"{description}\""));
            }
        }
        if let Some(scope) = self.scope.as_deref().map(sanitize) {
            if !scope.is_empty() {
                value.push_str(&format!(", scope=\"{scope}\""));
            }
        }
        value
    }
}

#[derive(Serialize)]
struct DenialBody<'a> {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_description: Option<&'a str>,
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let status = self.reason.status();
        let challenge =
            HeaderValue::from_str(&self.challenge()).unwrap_or(HeaderValue::from_static("Bearer"));
        let headers = [
            (header::WWW_AUTHENTICATE, challenge),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ];

        match self.reason.error_code() {
            None => (status, headers).into_response(),
            Some(error) => {
                let body = DenialBody {
                    error,
                    error_description: self.description.as_deref(),
                };
                (status, headers, Json(body)).into_response()
            }
        }
    }
}

/// Keep only characters allowed inside RFC 6750 quoted attribute values
/// (%x20-21 / %x23-5B / %x5D-7E).
fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| matches!(*c, ' '..='~') && *c != '"' && *c != '\\')
        .collect()
}
