pub mod certification;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /skills/{id}/certification/...       creator + reviewer reads, creator actions
/// /certification/criteria              criteria catalog
/// /admin/skills/{id}/...               reviewer decisions (admin, agent)
/// /admin/certification/requests/...    upgrade request queue (admin, agent)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/skills", certification::skill_router())
        .nest("/certification", certification::catalog_router())
        .nest("/admin", certification::admin_router())
}
