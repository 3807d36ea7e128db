//! Certification progress towards the next level.
//!
//! Pure computation over pre-loaded data: the caller supplies the skill's
//! metrics, the catalog criteria of the next level, any recorded checks and
//! whether an upgrade request is already pending.

use serde::Serialize;

use crate::certification::{CertificationLevel, CheckStatus};
use crate::criteria::{CriterionDefinition, SkillMetrics};
use crate::types::DbId;

/// A persisted check outcome for one criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCheck {
    pub criterion_id: DbId,
    pub status: CheckStatus,
    pub value: Option<String>,
}

/// Where a criterion's status came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSource {
    /// A persisted check (reviewer grade or earlier run).
    Recorded,
    /// Computed now from stored metrics.
    Live,
    /// Manual criterion with nothing recorded yet.
    AwaitingReview,
}

/// Status of one criterion of the next level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionStatus {
    pub criterion_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub auto_checkable: bool,
    pub weight: u32,
    pub status: CheckStatus,
    pub value: Option<String>,
    pub source: CheckSource,
}

/// Progress of a skill towards its next certification level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationProgress {
    pub current_level: CertificationLevel,
    pub next_level: Option<CertificationLevel>,
    pub progress_percentage: u32,
    pub criteria_status: Vec<CriterionStatus>,
    pub can_request_upgrade: bool,
    pub missing_criteria: Vec<String>,
}

/// Weighted share of passed criteria, rounded to the nearest integer percent.
///
/// Returns 0 when the total weight is 0.
pub fn weighted_progress(statuses: &[CriterionStatus]) -> u32 {
    let total: u64 = statuses.iter().map(|s| u64::from(s.weight)).sum();
    if total == 0 {
        return 0;
    }
    let passed: u64 = statuses
        .iter()
        .filter(|s| s.status == CheckStatus::Passed)
        .map(|s| u64::from(s.weight))
        .sum();
    ((passed as f64 / total as f64) * 100.0).round() as u32
}

/// Compute progress towards the level after `metrics.certification`.
///
/// `criteria` must be the catalog rows for that next level. A recorded check
/// takes precedence over live evaluation. Upgrade requests are only possible
/// for Silver and Gold, and only when every criterion passes and nothing is
/// already pending.
pub fn resolve_progress(
    metrics: &SkillMetrics,
    criteria: &[CriterionDefinition],
    recorded: &[RecordedCheck],
    has_pending_request: bool,
) -> CertificationProgress {
    let current_level = metrics.certification;
    let Some(next_level) = current_level.next() else {
        return CertificationProgress {
            current_level,
            next_level: None,
            progress_percentage: 100,
            criteria_status: Vec::new(),
            can_request_upgrade: false,
            missing_criteria: Vec::new(),
        };
    };

    let criteria_status: Vec<CriterionStatus> = criteria
        .iter()
        .filter(|c| c.level == next_level)
        .map(|criterion| {
            let (status, value, source) =
                match recorded.iter().find(|r| r.criterion_id == criterion.id) {
                    Some(check) => (check.status, check.value.clone(), CheckSource::Recorded),
                    None if criterion.is_auto() => {
                        let outcome = criterion.evaluate(metrics);
                        (outcome.status, outcome.value, CheckSource::Live)
                    }
                    None => (CheckStatus::Pending, None, CheckSource::AwaitingReview),
                };
            CriterionStatus {
                criterion_id: criterion.id,
                name: criterion.name.clone(),
                description: criterion.description.clone(),
                auto_checkable: criterion.is_auto(),
                weight: criterion.weight,
                status,
                value,
                source,
            }
        })
        .collect();

    let missing_criteria: Vec<String> = criteria_status
        .iter()
        .filter(|s| s.status != CheckStatus::Passed)
        .map(|s| s.name.clone())
        .collect();

    let auto_passing = criteria_status
        .iter()
        .filter(|s| s.auto_checkable)
        .all(|s| s.status == CheckStatus::Passed);

    let requestable = matches!(next_level, CertificationLevel::Silver | CertificationLevel::Gold);

    let can_request_upgrade = requestable
        && !criteria_status.is_empty()
        && auto_passing
        && missing_criteria.is_empty()
        && !has_pending_request;

    CertificationProgress {
        current_level,
        next_level: Some(next_level),
        progress_percentage: weighted_progress(&criteria_status),
        criteria_status,
        can_request_upgrade,
        missing_criteria,
    }
}

/// Whether every auto-checkable criterion passes (live or recorded).
///
/// This is the gate for filing an upgrade request; manual criteria are
/// graded after the request is filed.
pub fn auto_criteria_pass(progress: &CertificationProgress) -> bool {
    progress
        .criteria_status
        .iter()
        .filter(|s| s.auto_checkable)
        .all(|s| s.status == CheckStatus::Passed)
}
