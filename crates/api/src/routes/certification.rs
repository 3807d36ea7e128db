//! Route definitions for skill certification.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{certification, certification_admin};
use crate::state::AppState;

/// Skill-scoped routes, mounted at `/skills`.
///
/// ```text
/// POST   /{id}/certification/run         -> run_certification
/// GET    /{id}/certification             -> get_status
/// GET    /{id}/certification/history     -> get_history
/// GET    /{id}/certification/queue       -> get_queue_entry
/// POST   /{id}/certification/requests    -> file_upgrade_request
/// ```
pub fn skill_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/certification", get(certification::get_status))
        .route(
            "/{id}/certification/run",
            post(certification::run_certification),
        )
        .route(
            "/{id}/certification/history",
            get(certification::get_history),
        )
        .route(
            "/{id}/certification/queue",
            get(certification::get_queue_entry),
        )
        .route(
            "/{id}/certification/requests",
            post(certification::file_upgrade_request),
        )
}

/// Catalog routes, mounted at `/certification`.
pub fn catalog_router() -> Router<AppState> {
    Router::new().route("/criteria", get(certification::list_criteria))
}

/// Reviewer routes, mounted at `/admin`.
///
/// ```text
/// POST   /skills/{id}/certify                    -> certify_skill
/// POST   /skills/{id}/reject                     -> reject_skill
/// POST   /skills/{id}/request-changes            -> request_changes
/// PUT    /skills/{id}/checks/{criterion_id}      -> record_check
/// GET    /certification/requests                 -> list_pending_requests
/// POST   /certification/requests/{id}/decision   -> decide_request
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/skills/{id}/certify",
            post(certification_admin::certify_skill),
        )
        .route(
            "/skills/{id}/reject",
            post(certification_admin::reject_skill),
        )
        .route(
            "/skills/{id}/request-changes",
            post(certification_admin::request_changes),
        )
        .route(
            "/skills/{id}/checks/{criterion_id}",
            put(certification_admin::record_check),
        )
        .route(
            "/certification/requests",
            get(certification_admin::list_pending_requests),
        )
        .route(
            "/certification/requests/{id}/decision",
            post(certification_admin::decide_request),
        )
}
