//! Per-skill Bronze/Silver pipeline state.

use serde::Serialize;
use sqlx::FromRow;
use clawforge_core::certification::{CertificationLevel, QueueStatus, SkillStatus};
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `validation_queue` table (one per skill).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ValidationQueueEntry {
    pub id: DbId,
    pub skill_id: DbId,
    pub status: String,
    pub bronze_score: Option<i32>,
    pub silver_score: Option<i32>,
    pub score_breakdown: Option<serde_json::Value>,
    pub bronze_errors: serde_json::Value,
    pub bronze_warnings: serde_json::Value,
    pub archive_sha256: Option<String>,
    pub rejection_reason: Option<String>,
    pub processed_by: Option<DbId>,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for claiming the entry at the start of an automated run.
///
/// The claim only succeeds while the skill still holds the status and level
/// the run was started from and no other run holds a live claim.
#[derive(Debug, Clone)]
pub struct ClaimValidationRun {
    pub skill_id: DbId,
    pub expected_status: SkillStatus,
    pub expected_certification: CertificationLevel,
    /// A `processing` entry older than this is treated as abandoned.
    pub stale_after_secs: i64,
}

/// DTO for writing the full outcome of an automated run.
#[derive(Debug, Clone)]
pub struct CompleteValidationRun {
    pub skill_id: DbId,
    pub status: QueueStatus,
    pub bronze_score: Option<i32>,
    pub silver_score: Option<i32>,
    pub score_breakdown: Option<serde_json::Value>,
    pub bronze_errors: serde_json::Value,
    pub bronze_warnings: serde_json::Value,
    pub archive_sha256: Option<String>,
    pub rejection_reason: Option<String>,
}

/// DTO for recording a reviewer decision on the queue entry.
#[derive(Debug, Clone)]
pub struct RecordQueueDecision {
    pub skill_id: DbId,
    pub status: QueueStatus,
    pub processed_by: DbId,
    pub rejection_reason: Option<String>,
}
