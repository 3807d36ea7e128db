#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use clawforge_api::auth::jwt::{generate_access_token, JwtConfig};
use clawforge_api::config::ServerConfig;
use clawforge_api::router::build_app_router;
use clawforge_api::state::AppState;
use clawforge_core::bronze::ManifestValidator;
use clawforge_events::LogNotifier;
use clawforge_pipeline::{
    CertificationOrchestrator, CertificationStatusResolver, HttpArchiveFetcher, PgCertificationStore,
    PipelineConfig,
};

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://clawforge@localhost:1/unused".to_string(),
        jwt: JwtConfig {
            secret: "api-test-secret-that-is-long-enough".to_string(),
            issuer: "clawforge".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Full router over a lazy pool that never connects.
///
/// Only suitable for requests rejected before any query runs (authentication,
/// role checks, body validation).
pub fn build_offline_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");

    let pipeline_config = PipelineConfig::default();
    let store = Arc::new(PgCertificationStore::new(pool.clone()));
    let orchestrator = CertificationOrchestrator::new(
        store.clone(),
        Arc::new(HttpArchiveFetcher::new(&pipeline_config)),
        Arc::new(ManifestValidator),
        Arc::new(LogNotifier),
        pipeline_config,
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(orchestrator),
        resolver: Arc::new(CertificationStatusResolver::new(store)),
    };
    build_app_router(state, &config)
}

pub fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// Send a request and return the status and parsed JSON body.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
