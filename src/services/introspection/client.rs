//! Introspection authority interface used by the token validator.
use async_trait::async_trait;
use thiserror::Error;

/// What the validator asks the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionRequest {
    pub token: String,
    // Every scope here must be covered by the token.
    pub scopes: Vec<String>,
    // When set, the token must be bound to exactly this subject.
    pub subject: Option<String>,
}

impl IntrospectionRequest {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scopes: Vec::new(),
            subject: None,
        }
    }

    pub fn with_scopes(mut self, scopes: &[String]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    pub fn with_subject(mut self, subject: Option<&str>) -> Self {
        self.subject = subject.map(str::to_string);
        self
    }
}

/// The authority's decision about a token, after checking the request constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectionAction {
    /// Active, unexpired, and every constraint satisfied.
    Ok,
    /// Unknown, inactive, expired, revoked or malformed.
    InvalidToken,
    /// Active, but at least one required scope is not covered.
    InsufficientScope,
    /// Active, but issued for a different subject.
    SubjectMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectionResponse {
    pub action: IntrospectionAction,
    // Human-readable diagnostic, suitable for `error_description`.
    pub message: String,
    pub subject: Option<String>,
    pub scopes: Vec<String>,
    pub client_id: Option<String>,
    // Seconds since epoch.
    pub expires_at: Option<i64>,
}

/// Failures talking to the authority. The validator always treats these as
/// an invalid token (fail closed).
#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("introspection transport error: {0}")]
    Transport(String),
    #[error("introspection endpoint returned status {0}")]
    Status(u16),
    #[error("introspection response could not be decoded: {0}")]
    Decode(String),
}

/// A remote (or in-process) token introspection authority.
///
/// Implementations are shared across requests behind an `Arc` and must be safe
/// to call concurrently.
#[async_trait]
pub trait Introspector: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<IntrospectionResponse, IntrospectionError>;
}
