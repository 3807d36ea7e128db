use std::sync::Arc;

use clawforge_pipeline::{CertificationOrchestrator, CertificationStatusResolver};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: clawforge_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub orchestrator: Arc<CertificationOrchestrator>,
    pub resolver: Arc<CertificationStatusResolver>,
}
