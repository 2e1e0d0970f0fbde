//! In-process introspection authority for tests.
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::services::introspection::client::{
    IntrospectionError, IntrospectionRequest, IntrospectionResponse, Introspector,
};
use crate::services::introspection::rfc7662::{TokenIntrospection, evaluate};

/// Answers from a fixed token table and counts calls. Tokens not in the table
/// are inactive; `unavailable()` makes every call fail.
#[derive(Default)]
pub struct StaticIntrospector {
    tokens: HashMap<String, TokenIntrospection>,
    unavailable: bool,
    calls: AtomicUsize,
    last_request: Mutex<Option<IntrospectionRequest>>,
}

impl StaticIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_active(mut self, token: &str, scope: &str, sub: Option<&str>) -> Self {
        self.tokens.insert(
            token.to_string(),
            TokenIntrospection {
                active: true,
                scope: Some(scope.to_string()),
                sub: sub.map(str::to_string),
                client_id: Some("test-client".to_string()),
                exp: None,
            },
        );
        self
    }

    pub fn with_inactive(mut self, token: &str) -> Self {
        self.tokens
            .insert(token.to_string(), TokenIntrospection::default());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<IntrospectionRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Introspector for StaticIntrospector {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<IntrospectionResponse, IntrospectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if self.unavailable {
            return Err(IntrospectionError::Transport("connection refused".into()));
        }

        let reply = self.tokens.get(&request.token).cloned().unwrap_or_default();
        Ok(evaluate(reply, request, chrono::Utc::now().timestamp()))
    }
}
