/// Factory: build the introspection client from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::services::introspection::{HttpIntrospector, Introspector};

pub fn build_introspector(config: &Config) -> Result<Arc<dyn Introspector>, AppError> {
    let client = HttpIntrospector::new(&config.introspection).map_err(|err| {
        tracing::error!(error = %err, "failed to build introspection client");
        AppError::Internal
    })?;

    tracing::info!(
        endpoint = %config.introspection.endpoint,
        authenticated = config.introspection.client_id.is_some(),
        "introspection client ready"
    );

    Ok(Arc::new(client))
}
