/*
 * Responsibility
 * - Load Config -> build dependencies (introspection client) -> assemble the Router
 * - Apply middleware (HTTP / CORS / security headers)
 * - Start axum::serve() and stop cleanly on Ctrl-C / SIGTERM
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, v1::handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::services::introspection::build_introspector;
use crate::state::{AppState, EndpointPolicies};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,resource_server=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        // Production: default hook, the server keeps running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting resource server in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("resource server stopped");
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let introspector = build_introspector(config)?;
    let policies = EndpointPolicies::from_config(config);

    tracing::info!(
        time_scopes = ?policies.time.required_scopes,
        userinfo_scopes = ?policies.userinfo.required_scopes,
        "endpoint token requirements"
    );

    Ok(AppState::new(introspector, policies))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api::v1::routes())
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::services::introspection::testing::StaticIntrospector;

    fn config() -> Config {
        Config::from_lookup(|key: &str| match key {
            "INTROSPECTION_ENDPOINT" => Some("http://127.0.0.1:9/introspect".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn router(authority: StaticIntrospector) -> Router {
        let config = config();
        let state = AppState::new(Arc::new(authority), EndpointPolicies::from_config(&config));
        build_router(state, &config)
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let res = router(StaticIntrospector::new())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["introspection"], "static");
    }

    #[tokio::test]
    async fn denials_pass_through_the_middleware_stack() {
        let res = router(StaticIntrospector::new().with_inactive("T1"))
            .oneshot(
                Request::get("/api/time")
                    .header(header::AUTHORIZATION, "Bearer T1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn form_post_works_behind_the_body_limit() {
        let res = router(StaticIntrospector::new().with_active("T2", "", None))
            .oneshot(
                Request::post("/api/time")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("access_token=T2"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }
}
