//! Creator-facing certification handlers.
//!
//! A creator may only act on their own skills; admins and agents may read
//! any skill.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use clawforge_core::certification::CertificationLevel;
use clawforge_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCreator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FileRequestBody {
    pub level: CertificationLevel,
}

#[derive(Debug, Deserialize)]
pub struct CriteriaParams {
    pub level: Option<CertificationLevel>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /skills/{id}/certification/run
///
/// Run Bronze validation and Silver scoring. A failed validation still
/// answers 200 with `final_status = "rejected"`.
pub async fn run_certification(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let skill = state.orchestrator.find_skill(skill_id).await?;
    user.ensure_can_access(&skill)?;

    let outcome = state.orchestrator.run_certification(skill_id).await?;

    tracing::info!(
        user_id = user.user_id,
        skill_id,
        final_status = %outcome.final_status,
        "Certification run requested",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /skills/{id}/certification
pub async fn get_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let skill = state.orchestrator.find_skill(skill_id).await?;
    user.ensure_can_access(&skill)?;

    let status = state.resolver.get_status(skill_id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// GET /skills/{id}/certification/history
///
/// Newest grant first.
pub async fn get_history(
    user: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let skill = state.orchestrator.find_skill(skill_id).await?;
    user.ensure_can_access(&skill)?;

    let history = state.orchestrator.history(skill_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /skills/{id}/certification/queue
pub async fn get_queue_entry(
    user: AuthUser,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let skill = state.orchestrator.find_skill(skill_id).await?;
    user.ensure_can_access(&skill)?;

    let entry = state.orchestrator.queue_entry(skill_id).await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /skills/{id}/certification/requests
pub async fn file_upgrade_request(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
    Json(body): Json<FileRequestBody>,
) -> AppResult<impl IntoResponse> {
    let skill = state.orchestrator.find_skill(skill_id).await?;
    user.ensure_can_access(&skill)?;

    let request = state
        .orchestrator
        .file_upgrade_request(skill_id, body.level, user.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /certification/criteria?level=silver|gold
///
/// Without `level`, returns the Silver catalog followed by the Gold one.
pub async fn list_criteria(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CriteriaParams>,
) -> AppResult<impl IntoResponse> {
    let levels = match params.level {
        Some(level) => vec![level],
        None => vec![CertificationLevel::Silver, CertificationLevel::Gold],
    };

    let mut criteria = Vec::new();
    for level in levels {
        criteria.extend(state.orchestrator.criteria(level).await?);
    }
    Ok(Json(DataResponse { data: criteria }))
}
