//! Certification Status Resolver: read-only progress towards the next level.

use std::sync::Arc;

use serde::Serialize;
use clawforge_core::certification::CertificationLevel;
use clawforge_core::criteria::CriterionDefinition;
use clawforge_core::status::{resolve_progress, CertificationProgress, RecordedCheck};
use clawforge_core::types::DbId;
use clawforge_db::models::certification_request::CertificationRequest;
use clawforge_db::models::skill::Skill;

use crate::error::CertificationError;
use crate::store::CertificationStore;

/// Progress plus the skill's open upgrade request, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CertificationStatus {
    pub skill_id: DbId,
    #[serde(flatten)]
    pub progress: CertificationProgress,
    pub pending_request: Option<CertificationRequest>,
}

pub struct CertificationStatusResolver {
    store: Arc<dyn CertificationStore>,
}

impl CertificationStatusResolver {
    pub fn new(store: Arc<dyn CertificationStore>) -> Self {
        Self { store }
    }

    /// Progress of `skill_id` towards its next certification level.
    ///
    /// Read failures propagate; there is no meaningful partial status.
    pub async fn get_status(&self, skill_id: DbId) -> Result<CertificationStatus, CertificationError> {
        let skill = self
            .store
            .find_skill(skill_id)
            .await?
            .ok_or(CertificationError::NotFound {
                entity: "Skill",
                id: skill_id,
            })?;

        let pending_request = self.store.find_pending_request(skill_id).await?;
        let progress =
            load_progress(self.store.as_ref(), &skill, pending_request.is_some()).await?;

        Ok(CertificationStatus {
            skill_id,
            progress,
            pending_request,
        })
    }
}

/// Load and resolve the catalog of one level.
pub(crate) async fn load_definitions(
    store: &dyn CertificationStore,
    level: CertificationLevel,
) -> Result<Vec<CriterionDefinition>, CertificationError> {
    store
        .list_criteria(level)
        .await?
        .iter()
        .map(|row| row.to_definition().map_err(CertificationError::from))
        .collect()
}

/// Compute progress for an already-loaded skill.
pub(crate) async fn load_progress(
    store: &dyn CertificationStore,
    skill: &Skill,
    has_pending_request: bool,
) -> Result<CertificationProgress, CertificationError> {
    let metrics = skill.metrics().map_err(CertificationError::stored)?;

    // The catalog only holds Silver and Gold criteria.
    let criteria = match metrics.certification.next() {
        Some(level @ (CertificationLevel::Silver | CertificationLevel::Gold)) => {
            load_definitions(store, level).await?
        }
        _ => Vec::new(),
    };

    let recorded = store
        .list_checks(skill.id)
        .await?
        .iter()
        .map(|check| check.to_recorded())
        .collect::<Result<Vec<RecordedCheck>, _>>()
        .map_err(CertificationError::stored)?;

    Ok(resolve_progress(
        &metrics,
        &criteria,
        &recorded,
        has_pending_request,
    ))
}
