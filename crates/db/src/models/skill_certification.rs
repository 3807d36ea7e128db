//! Append-only history of granted certification levels.

use serde::Serialize;
use sqlx::FromRow;
use clawforge_core::certification::CertificationLevel;
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `skill_certifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkillCertification {
    pub id: DbId,
    pub skill_id: DbId,
    pub level: String,
    pub granted_by: Option<DbId>,
    pub notes: Option<String>,
    pub score_snapshot: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a history row.
#[derive(Debug, Clone)]
pub struct CreateSkillCertification {
    pub skill_id: DbId,
    pub level: CertificationLevel,
    /// `None` when granted by the automated pipeline.
    pub granted_by: Option<DbId>,
    pub notes: Option<String>,
    pub score_snapshot: Option<serde_json::Value>,
}
