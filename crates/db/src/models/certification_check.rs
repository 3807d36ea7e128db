//! Per-skill criterion check outcomes.

use serde::Serialize;
use sqlx::FromRow;
use clawforge_core::certification::CheckStatus;
use clawforge_core::error::CoreError;
use clawforge_core::status::RecordedCheck;
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `skill_certification_checks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkillCertificationCheck {
    pub id: DbId,
    pub skill_id: DbId,
    pub criterion_id: DbId,
    pub status: String,
    pub value: Option<String>,
    pub checked_by: Option<DbId>,
    pub checked_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl SkillCertificationCheck {
    pub fn to_recorded(&self) -> Result<RecordedCheck, CoreError> {
        Ok(RecordedCheck {
            criterion_id: self.criterion_id,
            status: CheckStatus::from_str_value(&self.status)?,
            value: self.value.clone(),
        })
    }
}

/// DTO for inserting or overwriting the check of one (skill, criterion).
#[derive(Debug, Clone)]
pub struct UpsertCertificationCheck {
    pub skill_id: DbId,
    pub criterion_id: DbId,
    pub status: CheckStatus,
    pub value: Option<String>,
    pub checked_by: Option<DbId>,
}
