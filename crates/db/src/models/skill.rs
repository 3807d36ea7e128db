//! Skill model and the conditional-update DTO used for lifecycle transitions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use clawforge_core::certification::{CertificationLevel, SkillStatus};
use clawforge_core::criteria::SkillMetrics;
use clawforge_core::error::CoreError;
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub creator_id: DbId,
    pub name: String,
    pub archive_url: Option<String>,
    pub status: String,
    pub certification: String,
    pub quality_score: i32,
    pub sales_count: i64,
    pub average_rating: f64,
    pub published_at: Option<Timestamp>,
    pub certified_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Skill {
    /// Parsed lifecycle status.
    pub fn status(&self) -> Result<SkillStatus, CoreError> {
        SkillStatus::from_str_value(&self.status)
    }

    /// Parsed certification level.
    pub fn certification_level(&self) -> Result<CertificationLevel, CoreError> {
        CertificationLevel::from_str_value(&self.certification)
    }

    /// Snapshot of the metrics auto-checkable criteria read.
    pub fn metrics(&self) -> Result<SkillMetrics, CoreError> {
        Ok(SkillMetrics {
            certification: self.certification_level()?,
            quality_score: self.quality_score,
            sales_count: self.sales_count,
            average_rating: self.average_rating,
        })
    }
}

/// DTO for creating a skill (submission itself lives outside this engine).
#[derive(Debug, Deserialize)]
pub struct CreateSkill {
    pub creator_id: DbId,
    pub name: String,
    pub archive_url: Option<String>,
    pub status: Option<String>,
}

/// Conditional (compare-and-swap) update of a skill's status/certification.
///
/// `expected_*` fields guard the update: when set, the row is only updated
/// if the stored value still matches. `None` target fields leave the column
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillTransition {
    pub expected_status: Option<SkillStatus>,
    pub expected_certification: Option<CertificationLevel>,
    pub status: Option<SkillStatus>,
    pub certification: Option<CertificationLevel>,
    /// Stamp `published_at` if it is not already set.
    pub mark_published: bool,
}
