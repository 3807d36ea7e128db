//! Certification levels, lifecycle statuses and hierarchy rules.
//!
//! Every enum here is persisted as its snake_case string (see the `CHECK`
//! constraints in the migrations) and converted with `as_str` /
//! `from_str_value` at the persistence boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Silver score at or above which a bronze skill is queued for Silver review.
pub const DEFAULT_SILVER_REVIEW_THRESHOLD: u32 = 80;

/// Bronze score deducted per validator warning.
pub const BRONZE_WARNING_PENALTY: u32 = 5;

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Convert to the database string value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $val ),+
                }
            }

            /// Convert from a database string value.
            pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
                match s {
                    $( $val => Ok(Self::$variant), )+
                    _ => Err(CoreError::Validation(format!(
                        "Invalid {} '{s}'. Must be one of: {}",
                        $label,
                        [$( $val ),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

string_enum! {
    /// Ordered certification tier. Declaration order is the upgrade order.
    #[derive(PartialOrd, Ord)]
    CertificationLevel, "certification level" {
        None = "none",
        Bronze = "bronze",
        Silver = "silver",
        Gold = "gold",
    }
}

string_enum! {
    /// Marketplace lifecycle status of a skill.
    SkillStatus, "skill status" {
        Draft = "draft",
        Pending = "pending",
        Published = "published",
        Rejected = "rejected",
        Withdrawn = "withdrawn",
        Blocked = "blocked",
        PendingPaymentSetup = "pending_payment_setup",
        ChangesRequested = "changes_requested",
    }
}

string_enum! {
    /// Stage of the asynchronous Bronze/Silver pipeline for one skill.
    QueueStatus, "queue status" {
        Processing = "processing",
        BronzeAuto = "bronze_auto",
        PendingSilverReview = "pending_silver_review",
        Rejected = "rejected",
        SilverApproved = "silver_approved",
        GoldEligible = "gold_eligible",
    }
}

string_enum! {
    /// Lifecycle of a creator-filed upgrade request.
    RequestStatus, "request status" {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

string_enum! {
    /// Outcome of one certification criterion for one skill.
    CheckStatus, "check status" {
        Passed = "passed",
        Failed = "failed",
        Pending = "pending",
    }
}

string_enum! {
    /// What happens to the certification level when a skill is rejected.
    RejectionPolicy, "rejection policy" {
        /// Leave the level as it was; only the status changes.
        KeepCertification = "keep_certification",
        /// Drop the level back to `none`.
        ResetCertification = "reset_certification",
    }
}

impl CertificationLevel {
    /// The next tier in the fixed upgrade order, or `None` at Gold.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::None => Some(Self::Bronze),
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => None,
        }
    }

    /// Whether this level is at least `other` in the upgrade order.
    pub fn at_least(self, other: Self) -> bool {
        self >= other
    }
}

impl Default for RejectionPolicy {
    fn default() -> Self {
        Self::KeepCertification
    }
}

impl RejectionPolicy {
    /// The certification level to write when rejecting, if any change is due.
    pub fn level_after_rejection(self, current: CertificationLevel) -> Option<CertificationLevel> {
        match self {
            Self::KeepCertification => None,
            Self::ResetCertification if current != CertificationLevel::None => {
                Some(CertificationLevel::None)
            }
            Self::ResetCertification => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition rules
// ---------------------------------------------------------------------------

/// Statuses from which an automated certification run may start.
pub const RUNNABLE_STATUSES: &[SkillStatus] = &[SkillStatus::Pending, SkillStatus::ChangesRequested];

/// Check that a certification run may start from `status`.
pub fn validate_run_status(status: SkillStatus) -> Result<(), CoreError> {
    if RUNNABLE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Skill must be pending or changes_requested to run certification, got '{status}'"
        )))
    }
}

/// Check that an admin/agent may grant `target` to a skill currently at `current`.
///
/// Bronze is only ever granted by the automated pipeline. Silver requires
/// exactly Bronze; Gold requires exactly Silver.
pub fn validate_certify(
    current: CertificationLevel,
    target: CertificationLevel,
) -> Result<(), CoreError> {
    match target {
        CertificationLevel::None | CertificationLevel::Bronze => Err(CoreError::Validation(
            format!("Level '{target}' cannot be granted manually"),
        )),
        CertificationLevel::Silver if current == CertificationLevel::Gold => Err(
            CoreError::Validation("Skill is already Gold certified".to_string()),
        ),
        CertificationLevel::Silver if current != CertificationLevel::Bronze => {
            Err(CoreError::Validation(format!(
                "Silver certification requires Bronze, skill is '{current}'"
            )))
        }
        CertificationLevel::Gold if current != CertificationLevel::Silver => {
            Err(CoreError::Validation(format!(
                "Gold certification requires Silver, skill is '{current}'"
            )))
        }
        _ => Ok(()),
    }
}

/// Check that a creator may request `requested` for a skill at `current`.
///
/// Only the immediately next tier is requestable, and Bronze is never
/// requested (it comes from the automated run).
pub fn validate_upgrade_target(
    current: CertificationLevel,
    requested: CertificationLevel,
) -> Result<(), CoreError> {
    if requested == CertificationLevel::None || requested == CertificationLevel::Bronze {
        return Err(CoreError::Validation(format!(
            "Level '{requested}' cannot be requested"
        )));
    }
    validate_certify(current, requested)
}

/// Queue status recorded once `level` is granted by a reviewer.
pub fn queue_status_for_level(level: CertificationLevel) -> Option<QueueStatus> {
    match level {
        CertificationLevel::Silver => Some(QueueStatus::SilverApproved),
        CertificationLevel::Gold => Some(QueueStatus::GoldEligible),
        CertificationLevel::None | CertificationLevel::Bronze => None,
    }
}

/// Queue status after Bronze passed, given the (optional) Silver score.
pub fn queue_status_for_silver_score(score: Option<u32>, threshold: u32) -> QueueStatus {
    match score {
        Some(s) if s >= threshold => QueueStatus::PendingSilverReview,
        _ => QueueStatus::BronzeAuto,
    }
}

/// Numeric Bronze score: 100 less a fixed penalty per warning, 0 when invalid.
pub fn bronze_score(valid: bool, warning_count: usize) -> u32 {
    if !valid {
        return 0;
    }
    let penalty = (warning_count as u32).saturating_mul(BRONZE_WARNING_PENALTY);
    100u32.saturating_sub(penalty)
}
