//! Access token validation against the introspection authority.
//!
//! `validate` never fails: every outcome, including an unreachable authority,
//! is a `Verdict`. A request without a token is denied without calling out.

use std::sync::Arc;

use crate::services::auth::denial::{Denial, DenialReason};
use crate::services::introspection::{
    IntrospectionAction, IntrospectionRequest, IntrospectionResponse, Introspector,
};

/// What a protected resource demands of the token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePolicy {
    pub required_scopes: Vec<String>,
    pub required_subject: Option<String>,
}

impl ResourcePolicy {
    pub fn with_scopes(scopes: Vec<String>) -> Self {
        Self {
            required_scopes: scopes,
            required_subject: None,
        }
    }
}

/// Facts about a token that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub subject: Option<String>,
    pub scopes: Vec<String>,
    pub client_id: Option<String>,
    pub expires_at: Option<i64>,
}

impl From<IntrospectionResponse> for TokenInfo {
    fn from(res: IntrospectionResponse) -> Self {
        Self {
            subject: res.subject,
            scopes: res.scopes,
            client_id: res.client_id,
            expires_at: res.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(TokenInfo),
    Invalid(Denial),
}

#[derive(Clone)]
pub struct AccessTokenValidator {
    introspector: Arc<dyn Introspector>,
}

impl AccessTokenValidator {
    pub fn new(introspector: Arc<dyn Introspector>) -> Self {
        Self { introspector }
    }

    pub fn backend_name(&self) -> &'static str {
        self.introspector.backend_name()
    }

    pub async fn validate(
        &self,
        token: Option<&str>,
        required_scopes: &[String],
        required_subject: Option<&str>,
    ) -> Verdict {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::debug!("no access token in request");
            return Verdict::Invalid(Denial::missing_token());
        };

        let request = IntrospectionRequest::new(token)
            .with_scopes(required_scopes)
            .with_subject(required_subject);

        let res = match self.introspector.introspect(&request).await {
            Ok(res) => res,
            Err(err) => {
                tracing::warn!(
                    backend = self.introspector.backend_name(),
                    error = %err,
                    "introspection failed; denying request"
                );
                return Verdict::Invalid(Denial::new(
                    DenialReason::AuthorityUnavailable,
                    "The access token could not be verified.",
                ));
            }
        };

        let verdict = judge(res, &request);
        if let Verdict::Invalid(denial) = &verdict {
            tracing::debug!(reason = ?denial.reason, "access token rejected");
        }
        verdict
    }

    pub async fn validate_for(&self, token: Option<&str>, policy: &ResourcePolicy) -> Verdict {
        self.validate(
            token,
            &policy.required_scopes,
            policy.required_subject.as_deref(),
        )
        .await
    }
}

/// Turn the authority's decision into a verdict. An `Ok` that contradicts the
/// request constraints is still refused.
fn judge(res: IntrospectionResponse, request: &IntrospectionRequest) -> Verdict {
    match res.action {
        IntrospectionAction::Ok => {
            if let Some(missing) = request.scopes.iter().find(|s| !res.scopes.contains(s)) {
                return Verdict::Invalid(Denial::insufficient_scope(
                    format!("The access token does not cover the required scope '{missing}'."),
                    &request.scopes,
                ));
            }
            if let Some(required) = request.subject.as_deref() {
                if res.subject.as_deref() != Some(required) {
                    return Verdict::Invalid(Denial::new(
                        DenialReason::SubjectMismatch,
                        "The access token was not issued for the required subject.",
                    ));
                }
            }
            Verdict::Valid(res.into())
        }
        IntrospectionAction::InvalidToken => {
            Verdict::Invalid(Denial::new(DenialReason::InvalidToken, res.message))
        }
        IntrospectionAction::InsufficientScope => {
            Verdict::Invalid(Denial::insufficient_scope(res.message, &request.scopes))
        }
        IntrospectionAction::SubjectMismatch => {
            Verdict::Invalid(Denial::new(DenialReason::SubjectMismatch, res.message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::introspection::testing::StaticIntrospector;

    fn scopes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn reason(verdict: &Verdict) -> Option<DenialReason> {
        match verdict {
            Verdict::Valid(_) => None,
            Verdict::Invalid(d) => Some(d.reason),
        }
    }

    #[tokio::test]
    async fn absent_token_is_denied_without_calling_the_authority() {
        let authority = Arc::new(StaticIntrospector::new().with_active("T1", "", None));
        let validator = AccessTokenValidator::new(authority.clone());

        for candidate in [None, Some("")] {
            let verdict = validator.validate(candidate, &scopes(&["a"]), None).await;
            assert_eq!(verdict, Verdict::Invalid(Denial::missing_token()));
        }
        assert_eq!(authority.calls(), 0);
    }

    #[tokio::test]
    async fn present_token_calls_the_authority_once_with_constraints() {
        let authority = Arc::new(StaticIntrospector::new().with_active("T1", "a b", Some("alice")));
        let validator = AccessTokenValidator::new(authority.clone());

        let verdict = validator
            .validate(Some("T1"), &scopes(&["a"]), Some("alice"))
            .await;

        assert!(matches!(verdict, Verdict::Valid(_)));
        assert_eq!(authority.calls(), 1);
        assert_eq!(
            authority.last_request(),
            Some(
                IntrospectionRequest::new("T1")
                    .with_scopes(&scopes(&["a"]))
                    .with_subject(Some("alice"))
            )
        );
    }

    #[tokio::test]
    async fn valid_verdict_implies_scope_superset() {
        let authority = Arc::new(StaticIntrospector::new().with_active("T1", "b x a", None));
        let validator = AccessTokenValidator::new(authority);

        match validator.validate(Some("T1"), &scopes(&["a", "b"]), None).await {
            Verdict::Valid(info) => {
                assert!(["a", "b"].iter().all(|s| info.scopes.iter().any(|t| t == s)));
                assert_eq!(info.client_id.as_deref(), Some("test-client"));
            }
            other => panic!("expected valid verdict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn inactive_token_is_invalid_token() {
        let validator =
            AccessTokenValidator::new(Arc::new(StaticIntrospector::new().with_inactive("T1")));
        let verdict = validator.validate(Some("T1"), &[], None).await;
        assert_eq!(reason(&verdict), Some(DenialReason::InvalidToken));
    }

    #[tokio::test]
    async fn unknown_token_is_invalid_token() {
        let validator = AccessTokenValidator::new(Arc::new(StaticIntrospector::new()));
        let verdict = validator.validate(Some("nope"), &[], None).await;
        assert_eq!(reason(&verdict), Some(DenialReason::InvalidToken));
    }

    #[tokio::test]
    async fn missing_scope_is_insufficient_scope() {
        let validator = AccessTokenValidator::new(Arc::new(
            StaticIntrospector::new().with_active("T2", "read", None),
        ));
        let verdict = validator
            .validate(Some("T2"), &scopes(&["read", "write"]), None)
            .await;

        match verdict {
            Verdict::Invalid(denial) => {
                assert_eq!(denial.reason, DenialReason::InsufficientScope);
                assert_eq!(denial.scope.as_deref(), Some("read write"));
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_subject_is_subject_mismatch() {
        let validator = AccessTokenValidator::new(Arc::new(
            StaticIntrospector::new().with_active("T1", "", Some("bob")),
        ));
        let verdict = validator.validate(Some("T1"), &[], Some("alice")).await;
        assert_eq!(reason(&verdict), Some(DenialReason::SubjectMismatch));
    }

    #[tokio::test]
    async fn unreachable_authority_fails_closed() {
        let authority = Arc::new(StaticIntrospector::unavailable());
        let validator = AccessTokenValidator::new(authority.clone());

        let verdict = validator.validate(Some("T1"), &[], None).await;

        assert_eq!(reason(&verdict), Some(DenialReason::AuthorityUnavailable));
        assert_eq!(authority.calls(), 1);
    }

    #[test]
    fn ok_that_contradicts_the_constraints_is_refused() {
        let request = IntrospectionRequest::new("T1")
            .with_scopes(&scopes(&["a"]))
            .with_subject(Some("alice"));
        let ok = |scopes: Vec<String>, subject: Option<&str>| IntrospectionResponse {
            action: IntrospectionAction::Ok,
            message: String::new(),
            subject: subject.map(str::to_string),
            scopes,
            client_id: None,
            expires_at: None,
        };

        assert_eq!(
            reason(&judge(ok(vec![], Some("alice")), &request)),
            Some(DenialReason::InsufficientScope)
        );
        assert_eq!(
            reason(&judge(ok(scopes(&["a"]), Some("bob")), &request)),
            Some(DenialReason::SubjectMismatch)
        );
        assert!(matches!(
            judge(ok(scopes(&["a"]), Some("alice")), &request),
            Verdict::Valid(_)
        ));
    }
}
