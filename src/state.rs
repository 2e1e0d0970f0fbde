/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - the token validator (holds the introspection client handle)
 *   - per-endpoint token requirements
 * - Cheap to Clone (Arc inside); nothing in here is mutated per request
 */
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AccessTokenValidator, ResourcePolicy};
use crate::services::introspection::Introspector;

/// Token requirements of each protected endpoint.
#[derive(Debug, Clone, Default)]
pub struct EndpointPolicies {
    pub time: ResourcePolicy,
    pub userinfo: ResourcePolicy,
}

impl EndpointPolicies {
    pub fn from_config(config: &Config) -> Self {
        Self {
            time: ResourcePolicy::with_scopes(config.time_required_scopes.clone()),
            userinfo: ResourcePolicy::with_scopes(config.userinfo_required_scopes.clone()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth: AccessTokenValidator,
    pub policies: Arc<EndpointPolicies>,
}

impl AppState {
    pub fn new(introspector: Arc<dyn Introspector>, policies: EndpointPolicies) -> Self {
        Self {
            auth: AccessTokenValidator::new(introspector),
            policies: Arc::new(policies),
        }
    }
}
