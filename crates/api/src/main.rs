use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clawforge_api::config::ServerConfig;
use clawforge_api::router::build_app_router;
use clawforge_api::state::AppState;
use clawforge_core::bronze::ManifestValidator;
use clawforge_events::{build_notifier, EmailConfig};
use clawforge_pipeline::{
    CertificationOrchestrator, CertificationStatusResolver, HttpArchiveFetcher, PgCertificationStore,
    PipelineConfig,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "clawforge_api=debug,clawforge_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        silver_review_threshold = pipeline_config.silver_review_threshold,
        rejection_policy = %pipeline_config.rejection_policy,
        "Loaded configuration",
    );

    // --- Database ---
    let pool = clawforge_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    clawforge_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    clawforge_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    // --- Certification pipeline ---
    let store = Arc::new(PgCertificationStore::new(pool.clone()));
    let notifier = build_notifier(EmailConfig::from_env(), pool.clone());
    let orchestrator = CertificationOrchestrator::new(
        store.clone(),
        Arc::new(HttpArchiveFetcher::new(&pipeline_config)),
        Arc::new(ManifestValidator),
        notifier,
        pipeline_config,
    );
    let resolver = CertificationStatusResolver::new(store);

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        orchestrator: Arc::new(orchestrator),
        resolver: Arc::new(resolver),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
