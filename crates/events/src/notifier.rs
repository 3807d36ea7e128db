//! Certification notices and the notifier implementations.
//!
//! Notification delivery is best-effort: the pipeline logs a failed
//! [`CertificationNotifier::notify`] and carries on, so a broken mail relay
//! never rolls back a certification decision.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use clawforge_core::certification::CertificationLevel;
use clawforge_core::types::DbId;
use clawforge_db::repositories::UserRepo;

use crate::delivery::email::{EmailConfig, EmailDelivery, EmailError};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// What happened to a skill's certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CertificationNotice {
    /// Creator filed an upgrade request.
    RequestFiled { level: CertificationLevel },
    /// Automated run granted Bronze.
    BronzeCertified { silver_score: Option<u32> },
    /// Silver score crossed the review threshold.
    SilverReviewPending { silver_score: u32 },
    /// A reviewer granted a level below Gold.
    Approved { level: CertificationLevel },
    GoldAwarded,
    Rejected { reason: String },
    ChangesRequested { feedback: String },
    /// A reviewer declined an upgrade request.
    RequestRejected {
        level: CertificationLevel,
        feedback: Option<String>,
    },
}

impl CertificationNotice {
    /// Short machine-friendly name, used as the log event type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestFiled { .. } => "request_filed",
            Self::BronzeCertified { .. } => "bronze_certified",
            Self::SilverReviewPending { .. } => "silver_review_pending",
            Self::Approved { .. } => "approved",
            Self::GoldAwarded => "gold_awarded",
            Self::Rejected { .. } => "rejected",
            Self::ChangesRequested { .. } => "changes_requested",
            Self::RequestRejected { .. } => "request_rejected",
        }
    }

    pub fn subject(&self, skill_name: &str) -> String {
        match self {
            Self::RequestFiled { level } => {
                format!("{level} certification requested for {skill_name}")
            }
            Self::BronzeCertified { .. } => format!("{skill_name} is Bronze certified"),
            Self::SilverReviewPending { .. } => format!("{skill_name} is queued for Silver review"),
            Self::Approved { level } => format!("{skill_name} is {level} certified"),
            Self::GoldAwarded => format!("{skill_name} earned Gold certification"),
            Self::Rejected { .. } => format!("{skill_name} was not approved"),
            Self::ChangesRequested { .. } => format!("Changes requested for {skill_name}"),
            Self::RequestRejected { level, .. } => {
                format!("{level} certification request for {skill_name} was declined")
            }
        }
    }

    pub fn body(&self, skill_name: &str) -> String {
        match self {
            Self::RequestFiled { level } => format!(
                "Your request for {level} certification of '{skill_name}' has been received and is awaiting review."
            ),
            Self::BronzeCertified { silver_score } => {
                let score = silver_score
                    .map(|s| format!(" Its quality score is {s}/100."))
                    .unwrap_or_default();
                format!("'{skill_name}' passed automated validation and is now published with Bronze certification.{score}")
            }
            Self::SilverReviewPending { silver_score } => format!(
                "'{skill_name}' scored {silver_score}/100 and has been queued for Silver review."
            ),
            Self::Approved { level } => {
                format!("'{skill_name}' has been granted {level} certification.")
            }
            Self::GoldAwarded => {
                format!("Congratulations: '{skill_name}' has been granted Gold certification.")
            }
            Self::Rejected { reason } => {
                format!("'{skill_name}' was rejected.\n\nReason: {reason}")
            }
            Self::ChangesRequested { feedback } => format!(
                "A reviewer requested changes to '{skill_name}'.\n\nFeedback: {feedback}"
            ),
            Self::RequestRejected { level, feedback } => {
                let feedback = feedback
                    .as_deref()
                    .map(|f| format!("\n\nFeedback: {f}"))
                    .unwrap_or_default();
                format!("Your {level} certification request for '{skill_name}' was declined.{feedback}")
            }
        }
    }
}

/// A notice addressed to the creator of a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub skill_id: DbId,
    pub skill_name: String,
    pub creator_id: DbId,
    pub notice: CertificationNotice,
}

// ---------------------------------------------------------------------------
// Notifier seam
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Recipient lookup failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User {0} not found")]
    UnknownRecipient(DbId),
}

/// Delivers certification notices to creators.
#[async_trait]
pub trait CertificationNotifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Emails the creator, looking up their address by user id.
pub struct EmailNotifier {
    delivery: EmailDelivery,
    pool: PgPool,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig, pool: PgPool) -> Self {
        Self {
            delivery: EmailDelivery::new(config),
            pool,
        }
    }
}

#[async_trait]
impl CertificationNotifier for EmailNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let user = UserRepo::find_by_id(&self.pool, notification.creator_id)
            .await?
            .ok_or(NotifyError::UnknownRecipient(notification.creator_id))?;

        self.delivery.deliver(&user.email, notification).await?;
        Ok(())
    }
}

/// Writes notices to the structured log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl CertificationNotifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            skill_id = notification.skill_id,
            creator_id = notification.creator_id,
            notice = notification.notice.kind(),
            subject = %notification.notice.subject(&notification.skill_name),
            "Certification notice (email delivery not configured)",
        );
        Ok(())
    }
}

/// Choose the notifier once at startup: SMTP when configured, log otherwise.
pub fn build_notifier(config: Option<EmailConfig>, pool: PgPool) -> Arc<dyn CertificationNotifier> {
    match config {
        Some(config) => {
            tracing::info!(smtp_host = %config.smtp_host, "Certification email delivery enabled");
            Arc::new(EmailNotifier::new(config, pool))
        }
        None => {
            tracing::info!("SMTP_HOST not set, certification notices will be logged only");
            Arc::new(LogNotifier)
        }
    }
}
