//! Certification criteria catalog model (read-only at runtime).

use serde::Serialize;
use sqlx::FromRow;
use clawforge_core::certification::CertificationLevel;
use clawforge_core::criteria::CriterionDefinition;
use clawforge_core::error::CoreError;
use clawforge_core::types::{DbId, Timestamp};

/// A row from the `certification_criteria` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CertificationCriterion {
    pub id: DbId,
    pub level: String,
    pub name: String,
    pub description: Option<String>,
    pub auto_checkable: bool,
    pub weight: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CertificationCriterion {
    /// Resolve the row into a definition with its evaluation rule.
    pub fn to_definition(&self) -> Result<CriterionDefinition, CoreError> {
        CriterionDefinition::resolve(
            self.id,
            CertificationLevel::from_str_value(&self.level)?,
            &self.name,
            self.description.clone(),
            self.auto_checkable,
            self.weight,
        )
    }
}
