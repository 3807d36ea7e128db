//! Certification criteria catalog rules.
//!
//! Catalog rows name their criterion with free text. Auto-checkable rows are
//! resolved into a closed [`AutoCheck`] variant when the catalog is loaded, so
//! an unknown auto-check name is a configuration error at load time instead
//! of a silent failing check at evaluation time.

use serde::{Deserialize, Serialize};

use crate::certification::{CertificationLevel, CheckStatus};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Minimum aggregate quality score for the `quality_score` criterion.
pub const MIN_QUALITY_SCORE: i32 = 80;

/// Minimum completed sales for the `sales_minimum` criterion.
pub const MIN_SALES: i64 = 5;

/// Minimum average rating for the `high_rating` criterion.
pub const MIN_AVERAGE_RATING: f64 = 4.5;

// ---------------------------------------------------------------------------
// Metrics snapshot
// ---------------------------------------------------------------------------

/// Stored skill metrics that auto-checks evaluate against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillMetrics {
    pub certification: CertificationLevel,
    pub quality_score: i32,
    pub sales_count: i64,
    pub average_rating: f64,
}

/// Result of evaluating one criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: CheckStatus,
    pub value: Option<String>,
}

impl CheckOutcome {
    fn from_bool(passed: bool, value: String) -> Self {
        Self {
            status: if passed {
                CheckStatus::Passed
            } else {
                CheckStatus::Failed
            },
            value: Some(value),
        }
    }
}

// ---------------------------------------------------------------------------
// AutoCheck
// ---------------------------------------------------------------------------

/// Criteria whose outcome is computed from stored metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoCheck {
    /// Aggregate quality score of at least [`MIN_QUALITY_SCORE`].
    QualityScore,
    /// At least [`MIN_SALES`] sales.
    SalesMinimum,
    /// Average rating of at least [`MIN_AVERAGE_RATING`].
    HighRating,
    /// Already Silver (or Gold) certified.
    SilverValidated,
}

impl AutoCheck {
    pub const ALL: &'static [AutoCheck] = &[
        Self::QualityScore,
        Self::SalesMinimum,
        Self::HighRating,
        Self::SilverValidated,
    ];

    /// Catalog name of this check.
    pub fn name(self) -> &'static str {
        match self {
            Self::QualityScore => "quality_score",
            Self::SalesMinimum => "sales_minimum",
            Self::HighRating => "high_rating",
            Self::SilverValidated => "silver_validated",
        }
    }

    /// Resolve a catalog name into a known check.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|check| check.name() == name)
    }

    pub fn evaluate(self, metrics: &SkillMetrics) -> CheckOutcome {
        match self {
            Self::QualityScore => CheckOutcome::from_bool(
                metrics.quality_score >= MIN_QUALITY_SCORE,
                metrics.quality_score.to_string(),
            ),
            Self::SalesMinimum => CheckOutcome::from_bool(
                metrics.sales_count >= MIN_SALES,
                metrics.sales_count.to_string(),
            ),
            Self::HighRating => CheckOutcome::from_bool(
                metrics.average_rating >= MIN_AVERAGE_RATING,
                format!("{:.2}", metrics.average_rating),
            ),
            Self::SilverValidated => CheckOutcome::from_bool(
                metrics.certification.at_least(CertificationLevel::Silver),
                metrics.certification.to_string(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Criterion definitions
// ---------------------------------------------------------------------------

/// How a criterion is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "check", rename_all = "snake_case")]
pub enum CriterionRule {
    Auto(AutoCheck),
    /// Graded by a reviewer; stays pending until a check is recorded.
    Manual,
}

/// A catalog criterion with its rule resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionDefinition {
    pub id: DbId,
    pub level: CertificationLevel,
    pub name: String,
    pub description: Option<String>,
    pub weight: u32,
    pub rule: CriterionRule,
}

impl CriterionDefinition {
    /// Build a definition from catalog columns, resolving auto-checks.
    pub fn resolve(
        id: DbId,
        level: CertificationLevel,
        name: &str,
        description: Option<String>,
        auto_checkable: bool,
        weight: i32,
    ) -> Result<Self, CoreError> {
        let rule = if auto_checkable {
            let check = AutoCheck::from_name(name).ok_or_else(|| {
                CoreError::Internal(format!(
                    "Criterion '{name}' (id {id}) is marked auto-checkable but has no rule. Known: {}",
                    AutoCheck::ALL
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            CriterionRule::Auto(check)
        } else {
            CriterionRule::Manual
        };

        let weight = u32::try_from(weight).map_err(|_| {
            CoreError::Internal(format!("Criterion '{name}' has negative weight {weight}"))
        })?;

        Ok(Self {
            id,
            level,
            name: name.to_string(),
            description,
            weight,
            rule,
        })
    }

    pub fn is_auto(&self) -> bool {
        matches!(self.rule, CriterionRule::Auto(_))
    }

    /// Live evaluation. Manual criteria are always pending.
    pub fn evaluate(&self, metrics: &SkillMetrics) -> CheckOutcome {
        match self.rule {
            CriterionRule::Auto(check) => check.evaluate(metrics),
            CriterionRule::Manual => CheckOutcome {
                status: CheckStatus::Pending,
                value: None,
            },
        }
    }
}
