/*
 * Responsibility
 * - Load settings from the environment (.env is optional)
 * - Validate them up front: missing or broken values fail startup
 * - Per-endpoint token requirements (required scopes)
 */
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Settings for talking to the introspection authority.
#[derive(Debug, Clone)]
pub struct IntrospectionConfig {
    pub endpoint: Url,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub introspection: IntrospectionConfig,

    pub time_required_scopes: Vec<String>,
    pub userinfo_required_scopes: Vec<String>,

    pub request_body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. `from_env` plugs in the process
    /// environment; tests plug in a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 1903,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let endpoint = lookup("INTROSPECTION_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("INTROSPECTION_ENDPOINT"))?;
        let endpoint = Url::parse(endpoint.trim())
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or(ConfigError::Invalid("INTROSPECTION_ENDPOINT"))?;

        let client_id = lookup("INTROSPECTION_CLIENT_ID").filter(|v| !v.is_empty());
        let client_secret = lookup("INTROSPECTION_CLIENT_SECRET").filter(|v| !v.is_empty());
        if client_secret.is_some() && client_id.is_none() {
            return Err(ConfigError::Missing("INTROSPECTION_CLIENT_ID"));
        }

        let timeout_seconds = parse_or(
            "INTROSPECTION_TIMEOUT_SECONDS",
            lookup("INTROSPECTION_TIMEOUT_SECONDS"),
            10u64,
        )?;

        let time_required_scopes =
            scope_list(lookup("TIME_REQUIRED_SCOPES").as_deref().unwrap_or(""));
        let userinfo_required_scopes =
            scope_list(lookup("USERINFO_REQUIRED_SCOPES").as_deref().unwrap_or("openid"));

        let request_body_limit_bytes = parse_or(
            "REQUEST_BODY_LIMIT_BYTES",
            lookup("REQUEST_BODY_LIMIT_BYTES"),
            1024 * 1024usize,
        )?;
        let request_timeout_seconds =
            parse_or("REQUEST_TIMEOUT_SECONDS", lookup("REQUEST_TIMEOUT_SECONDS"), 30u64)?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            introspection: IntrospectionConfig {
                endpoint,
                client_id,
                client_secret,
                timeout: Duration::from_secs(timeout_seconds),
            },
            time_required_scopes,
            userinfo_required_scopes,
            request_body_limit_bytes,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Split a scope list on commas and whitespace.
fn scope_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
