//! Reviewer certification handlers (`admin` and `agent` roles).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use clawforge_core::certification::{CertificationLevel, CheckStatus};
use clawforge_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::rbac::RequireReviewer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CertifyBody {
    pub level: CertificationLevel,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RejectBody {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestChangesBody {
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordCheckBody {
    pub status: CheckStatus,
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
    pub approve: bool,
    pub feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Skill decisions
// ---------------------------------------------------------------------------

/// POST /admin/skills/{id}/certify
pub async fn certify_skill(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
    Json(body): Json<CertifyBody>,
) -> AppResult<impl IntoResponse> {
    let skill = state
        .orchestrator
        .certify_skill(skill_id, body.level, user.user_id, body.notes)
        .await?;
    Ok(Json(DataResponse { data: skill }))
}

/// POST /admin/skills/{id}/reject
pub async fn reject_skill(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
    Json(body): Json<RejectBody>,
) -> AppResult<impl IntoResponse> {
    let skill = state
        .orchestrator
        .reject_skill(skill_id, &body.reason, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: skill }))
}

/// POST /admin/skills/{id}/request-changes
pub async fn request_changes(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path(skill_id): Path<DbId>,
    Json(body): Json<RequestChangesBody>,
) -> AppResult<impl IntoResponse> {
    let skill = state
        .orchestrator
        .request_changes(skill_id, &body.feedback, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: skill }))
}

/// PUT /admin/skills/{id}/checks/{criterion_id}
pub async fn record_check(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path((skill_id, criterion_id)): Path<(DbId, DbId)>,
    Json(body): Json<RecordCheckBody>,
) -> AppResult<impl IntoResponse> {
    let check = state
        .orchestrator
        .record_check(skill_id, criterion_id, body.status, body.value, user.user_id)
        .await?;
    Ok(Json(DataResponse { data: check }))
}

// ---------------------------------------------------------------------------
// Upgrade requests
// ---------------------------------------------------------------------------

/// GET /admin/certification/requests
///
/// Pending requests, oldest first.
pub async fn list_pending_requests(
    RequireReviewer(_user): RequireReviewer,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let requests = state.orchestrator.pending_requests().await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /admin/certification/requests/{id}/decision
pub async fn decide_request(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
    Json(body): Json<DecisionBody>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .orchestrator
        .decide_upgrade_request(request_id, body.approve, user.user_id, body.feedback)
        .await?;
    Ok(Json(DataResponse { data: request }))
}
