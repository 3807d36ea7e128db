//! Creator-filed certification upgrade requests.

use serde::Serialize;
use sqlx::FromRow;
use clawforge_core::certification::{CertificationLevel, RequestStatus};
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `certification_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificationRequest {
    pub id: DbId,
    pub skill_id: DbId,
    pub requested_level: String,
    pub requested_by: DbId,
    pub quality_score_snapshot: i32,
    pub status: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for filing a new (pending) request.
#[derive(Debug, Clone)]
pub struct CreateCertificationRequest {
    pub skill_id: DbId,
    pub requested_level: CertificationLevel,
    pub requested_by: DbId,
    pub quality_score_snapshot: i32,
}

/// DTO for closing a pending request.
#[derive(Debug, Clone)]
pub struct DecideCertificationRequest {
    pub status: RequestStatus,
    pub reviewed_by: DbId,
    pub feedback: Option<String>,
}
