//! RFC 7662 (OAuth 2.0 Token Introspection) client.
//!
//! The authority only reports what it knows about the token (`active`, `scope`,
//! `sub`, `exp`, ...). Required scopes and subject are checked here, so the
//! caller gets a single decision back.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::IntrospectionConfig;
use crate::services::introspection::client::{
    IntrospectionAction, IntrospectionError, IntrospectionRequest, IntrospectionResponse,
    Introspector,
};

/// Introspection reply body (RFC 7662 §2.2). Unknown members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenIntrospection {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

#[derive(Clone)]
pub struct HttpIntrospector {
    http: reqwest::Client,
    endpoint: Url,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl HttpIntrospector {
    pub fn new(config: &IntrospectionConfig) -> Result<Self, IntrospectionError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntrospectionError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl Introspector for HttpIntrospector {
    fn backend_name(&self) -> &'static str {
        "rfc7662"
    }

    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<IntrospectionResponse, IntrospectionError> {
        let form = [
            ("token", request.token.as_str()),
            ("token_type_hint", "access_token"),
        ];

        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&form);

        if let Some(client_id) = &self.client_id {
            builder = builder.basic_auth(client_id, self.client_secret.as_deref());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| IntrospectionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IntrospectionError::Status(status.as_u16()));
        }

        let reply: TokenIntrospection = resp
            .json()
            .await
            .map_err(|e| IntrospectionError::Decode(e.to_string()))?;

        Ok(evaluate(reply, request, chrono::Utc::now().timestamp()))
    }
}

/// Decide what an introspection reply means for the given request.
///
/// Order: activity, expiry, scopes, subject.
pub fn evaluate(
    reply: TokenIntrospection,
    request: &IntrospectionRequest,
    now: i64,
) -> IntrospectionResponse {
    let scopes: Vec<String> = reply
        .scope
        .as_deref()
        .unwrap_or("")
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let (action, message) = if !reply.active {
        (
            IntrospectionAction::InvalidToken,
            "The access token is not active.".to_string(),
        )
    } else if reply.exp.is_some_and(|exp| exp <= now) {
        (
            IntrospectionAction::InvalidToken,
            "The access token has expired.".to_string(),
        )
    } else if let Some(missing) = request.scopes.iter().find(|s| !scopes.contains(s)) {
        (
            IntrospectionAction::InsufficientScope,
            format!("The access token does not cover the required scope '{missing}'."),
        )
    } else if request
        .subject
        .as_deref()
        .is_some_and(|required| reply.sub.as_deref() != Some(required))
    {
        (
            IntrospectionAction::SubjectMismatch,
            "The access token was not issued for the required subject.".to_string(),
        )
    } else {
        (
            IntrospectionAction::Ok,
            "The access token is valid.".to_string(),
        )
    };

    IntrospectionResponse {
        action,
        message,
        subject: reply.sub,
        scopes,
        client_id: reply.client_id,
        expires_at: reply.exp,
    }
}
