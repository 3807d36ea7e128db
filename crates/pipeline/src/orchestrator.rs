//! Certification Orchestrator.
//!
//! Drives the per-skill state machine:
//!
//! ```text
//! pending / changes_requested
//!   -> run: fetch, Bronze (strict) -> rejected
//!                                 -> published + bronze -> Silver score
//!                                      >= threshold: pending_silver_review
//!                                      otherwise:    bronze_auto
//! reviewer: certify (silver | gold), reject, request changes
//! creator:  file upgrade request -> reviewer decides
//! ```
//!
//! Every skill mutation is a conditional update on the status/certification
//! read at the start of the operation. A run also claims the skill's queue
//! entry up front and only writes its outcome while that claim is intact, and
//! a request decision claims the request before granting anything. Losing
//! any of these races yields [`CertificationError::Conflict`] and nothing
//! further is written.

use std::sync::Arc;

use serde::Serialize;
use clawforge_core::archive::archive_digest;
use clawforge_core::bronze::{BronzeReport, BronzeValidator, ValidationMode};
use clawforge_core::certification::{
    queue_status_for_level, queue_status_for_silver_score, validate_certify, validate_run_status,
    validate_upgrade_target, CertificationLevel, CheckStatus, QueueStatus, RequestStatus,
    SkillStatus,
};
use clawforge_core::scoring::{score_bytes, SilverScore};
use clawforge_core::status::auto_criteria_pass;
use clawforge_core::types::DbId;
use clawforge_db::models::certification_check::{SkillCertificationCheck, UpsertCertificationCheck};
use clawforge_db::models::certification_criteria::CertificationCriterion;
use clawforge_db::models::certification_request::{
    CertificationRequest, CreateCertificationRequest, DecideCertificationRequest,
};
use clawforge_db::models::skill::{Skill, SkillTransition};
use clawforge_db::models::skill_certification::{CreateSkillCertification, SkillCertification};
use clawforge_db::models::validation_queue::{
    ClaimValidationRun, CompleteValidationRun, RecordQueueDecision, ValidationQueueEntry,
};
use clawforge_events::{CertificationNotice, CertificationNotifier, Notification};

use crate::config::PipelineConfig;
use crate::error::CertificationError;
use crate::fetcher::ArchiveFetcher;
use crate::resolver::load_progress;
use crate::store::CertificationStore;

/// Constraint backing the one-pending-request rule.
const ONE_PENDING_CONSTRAINT: &str = "uq_certification_requests_one_pending";

const PENDING_REQUEST_MESSAGE: &str = "Skill already has a pending certification request";

const CONFLICT_MESSAGE: &str = "Skill changed while the operation was in progress; reload and retry";

const RUN_CLAIMED_MESSAGE: &str =
    "A certification run is already in progress for this skill, or the skill changed";

const RUN_SUPERSEDED_MESSAGE: &str =
    "A reviewer decided on this skill while the certification run was in progress";

/// Result of one automated certification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub skill_id: DbId,
    pub final_status: SkillStatus,
    pub certification: CertificationLevel,
    pub queue_status: QueueStatus,
    pub bronze_score: u32,
    /// `None` when Bronze failed or scoring could not complete.
    pub silver_score: Option<u32>,
    pub rejection_reason: Option<String>,
    pub archive_sha256: Option<String>,
}

pub struct CertificationOrchestrator {
    store: Arc<dyn CertificationStore>,
    fetcher: Arc<dyn ArchiveFetcher>,
    validator: Arc<dyn BronzeValidator>,
    notifier: Arc<dyn CertificationNotifier>,
    config: PipelineConfig,
}

impl CertificationOrchestrator {
    pub fn new(
        store: Arc<dyn CertificationStore>,
        fetcher: Arc<dyn ArchiveFetcher>,
        validator: Arc<dyn BronzeValidator>,
        notifier: Arc<dyn CertificationNotifier>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            validator,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Automated run
    // -----------------------------------------------------------------------

    /// Run Bronze validation and Silver scoring for a submitted skill.
    ///
    /// Download and Bronze failures end in `Ok` with `final_status =
    /// rejected`; only precondition, concurrency and storage problems are
    /// returned as errors.
    pub async fn run_certification(&self, skill_id: DbId) -> Result<RunOutcome, CertificationError> {
        // 1. Load the skill and check it may run.
        let skill = self.find_skill(skill_id).await?;
        let status = skill.status().map_err(CertificationError::stored)?;
        let current = skill.certification_level().map_err(CertificationError::stored)?;
        validate_run_status(status)?;

        tracing::info!(skill_id, status = %status, "Certification run started");

        // 2. Claim the queue entry. Only a successful claim resets it.
        let claim = ClaimValidationRun {
            skill_id,
            expected_status: status,
            expected_certification: current,
            stale_after_secs: i64::try_from(self.config.stale_run_secs).unwrap_or(i64::MAX),
        };
        if self.store.mark_processing(&claim).await?.is_none() {
            tracing::warn!(skill_id, "Certification run not started, queue entry already claimed");
            return Err(CertificationError::Conflict(RUN_CLAIMED_MESSAGE.to_string()));
        }

        // 3. Fetch the archive.
        let bytes = match self.fetch_archive(&skill).await {
            Ok(bytes) => bytes,
            Err(reason) => {
                let report = BronzeReport::failed(reason);
                return self.finish_rejected(&skill, status, current, report, None).await;
            }
        };
        let archive_sha256 = archive_digest(&bytes);

        // 4. Bronze validation, strict.
        let report = self.validator.validate(&bytes, ValidationMode::Strict);
        if !report.valid {
            return self
                .finish_rejected(&skill, status, current, report, Some(archive_sha256))
                .await;
        }

        // 5. Publish with Bronze. A resubmitted skill keeps a higher level.
        let certification = current.max(CertificationLevel::Bronze);
        self.transition(
            skill_id,
            SkillTransition {
                expected_status: Some(status),
                expected_certification: Some(current),
                status: Some(SkillStatus::Published),
                certification: Some(certification),
                mark_published: true,
            },
        )
        .await?;

        if current < CertificationLevel::Bronze {
            self.store
                .append_certification(&CreateSkillCertification {
                    skill_id,
                    level: CertificationLevel::Bronze,
                    granted_by: None,
                    notes: None,
                    score_snapshot: Some(serde_json::json!({
                        "bronze_score": report.score(),
                        "archive_sha256": archive_sha256,
                    })),
                })
                .await?;
        }

        tracing::info!(skill_id, bronze_score = report.score(), "Bronze certification granted");

        // 6. Silver scoring, best effort.
        let silver = self.score_silver(skill_id, bytes).await;
        let silver_score = silver.as_ref().map(|s| s.score);
        if let Some(score) = silver_score {
            self.store
                .update_quality_score(skill_id, score as i32)
                .await?;
        }

        let queue_status =
            queue_status_for_silver_score(silver_score, self.config.silver_review_threshold);

        // 7. Persist the queue entry with both scores and the breakdown,
        //    unless a reviewer decision replaced the claim meanwhile.
        self.complete_run(&CompleteValidationRun {
            skill_id,
            status: queue_status,
            bronze_score: Some(report.score() as i32),
            silver_score: silver_score.map(|s| s as i32),
            score_breakdown: silver.as_ref().and_then(|s| serde_json::to_value(s).ok()),
            bronze_errors: issues_json(&report.errors),
            bronze_warnings: issues_json(&report.warnings),
            archive_sha256: Some(archive_sha256.clone()),
            rejection_reason: None,
        })
        .await?;

        tracing::info!(
            skill_id,
            silver_score,
            queue_status = %queue_status,
            "Certification run finished",
        );

        let notice = match (queue_status, silver_score) {
            (QueueStatus::PendingSilverReview, Some(silver_score)) => {
                CertificationNotice::SilverReviewPending { silver_score }
            }
            _ => CertificationNotice::BronzeCertified { silver_score },
        };
        self.notify(&skill, notice).await;

        Ok(RunOutcome {
            skill_id,
            final_status: SkillStatus::Published,
            certification,
            queue_status,
            bronze_score: report.score(),
            silver_score,
            rejection_reason: None,
            archive_sha256: Some(archive_sha256),
        })
    }

    async fn fetch_archive(&self, skill: &Skill) -> Result<Vec<u8>, String> {
        let Some(url) = skill.archive_url.as_deref().filter(|u| !u.trim().is_empty()) else {
            return Err("Skill has no archive to validate".to_string());
        };
        self.fetcher.fetch(url).await.map_err(|e| {
            tracing::warn!(skill_id = skill.id, error = %e, "Archive download failed");
            e.to_string()
        })
    }

    /// Score on the blocking pool so a panic in the scorer cannot take the run down.
    async fn score_silver(&self, skill_id: DbId, bytes: Vec<u8>) -> Option<SilverScore> {
        match tokio::task::spawn_blocking(move || score_bytes(&bytes)).await {
            Ok(Ok(score)) => Some(score),
            Ok(Err(e)) => {
                tracing::warn!(skill_id, error = %e, "Silver scoring failed, keeping Bronze");
                None
            }
            Err(e) => {
                tracing::error!(skill_id, error = %e, "Silver scoring aborted, keeping Bronze");
                None
            }
        }
    }

    async fn finish_rejected(
        &self,
        skill: &Skill,
        status: SkillStatus,
        current: CertificationLevel,
        report: BronzeReport,
        archive_sha256: Option<String>,
    ) -> Result<RunOutcome, CertificationError> {
        let reason = report.error_summary();

        let updated = self
            .transition(
                skill.id,
                SkillTransition {
                    expected_status: Some(status),
                    expected_certification: Some(current),
                    status: Some(SkillStatus::Rejected),
                    ..Default::default()
                },
            )
            .await?;

        self.complete_run(&CompleteValidationRun {
            skill_id: skill.id,
            status: QueueStatus::Rejected,
            bronze_score: Some(0),
            silver_score: None,
            score_breakdown: None,
            bronze_errors: issues_json(&report.errors),
            bronze_warnings: issues_json(&report.warnings),
            archive_sha256: archive_sha256.clone(),
            rejection_reason: Some(reason.clone()),
        })
        .await?;

        tracing::info!(skill_id = skill.id, reason = %reason, "Bronze validation failed, skill rejected");

        self.notify(
            skill,
            CertificationNotice::Rejected {
                reason: reason.clone(),
            },
        )
        .await;

        Ok(RunOutcome {
            skill_id: skill.id,
            final_status: SkillStatus::Rejected,
            certification: updated
                .certification_level()
                .map_err(CertificationError::stored)?,
            queue_status: QueueStatus::Rejected,
            bronze_score: 0,
            silver_score: None,
            rejection_reason: Some(reason),
            archive_sha256,
        })
    }

    // -----------------------------------------------------------------------
    // Reviewer decisions
    // -----------------------------------------------------------------------

    /// Grant Silver or Gold to a published skill.
    ///
    /// Silver requires the skill to hold exactly Bronze (and fails on Gold);
    /// Gold requires exactly Silver.
    pub async fn certify_skill(
        &self,
        skill_id: DbId,
        level: CertificationLevel,
        approver_id: DbId,
        notes: Option<String>,
    ) -> Result<Skill, CertificationError> {
        let skill = self.find_skill(skill_id).await?;
        let current = ensure_certifiable(&skill, level)?;

        let updated = self
            .transition(
                skill_id,
                SkillTransition {
                    expected_status: Some(SkillStatus::Published),
                    expected_certification: Some(current),
                    certification: Some(level),
                    ..Default::default()
                },
            )
            .await?;

        let queue = self.store.find_queue_entry(skill_id).await?;
        self.store
            .append_certification(&CreateSkillCertification {
                skill_id,
                level,
                granted_by: Some(approver_id),
                notes,
                score_snapshot: Some(serde_json::json!({
                    "quality_score": updated.quality_score,
                    "silver_score": queue.as_ref().and_then(|q| q.silver_score),
                    "sales_count": updated.sales_count,
                    "average_rating": updated.average_rating,
                })),
            })
            .await?;

        if let Some(queue_status) = queue_status_for_level(level) {
            self.store
                .record_queue_decision(&RecordQueueDecision {
                    skill_id,
                    status: queue_status,
                    processed_by: approver_id,
                    rejection_reason: None,
                })
                .await?;
        }

        tracing::info!(skill_id, level = %level, approver_id, "Certification granted");

        let notice = match level {
            CertificationLevel::Gold => CertificationNotice::GoldAwarded,
            other => CertificationNotice::Approved { level: other },
        };
        self.notify(&updated, notice).await;

        Ok(updated)
    }

    /// Reject a skill. The certification level follows the configured
    /// [`RejectionPolicy`](clawforge_core::certification::RejectionPolicy).
    pub async fn reject_skill(
        &self,
        skill_id: DbId,
        reason: &str,
        rejecter_id: DbId,
    ) -> Result<Skill, CertificationError> {
        let reason = require_text(reason, "A rejection reason is required")?;
        let skill = self.find_skill(skill_id).await?;
        let status = skill.status().map_err(CertificationError::stored)?;
        let current = skill.certification_level().map_err(CertificationError::stored)?;

        if status == SkillStatus::Rejected {
            return Err(CertificationError::Precondition(
                "Skill is already rejected".to_string(),
            ));
        }

        let updated = self
            .transition(
                skill_id,
                SkillTransition {
                    expected_status: Some(status),
                    expected_certification: Some(current),
                    status: Some(SkillStatus::Rejected),
                    certification: self.config.rejection_policy.level_after_rejection(current),
                    mark_published: false,
                },
            )
            .await?;

        self.store
            .record_queue_decision(&RecordQueueDecision {
                skill_id,
                status: QueueStatus::Rejected,
                processed_by: rejecter_id,
                rejection_reason: Some(reason.clone()),
            })
            .await?;

        self.close_pending_requests(skill_id, rejecter_id, &format!("Skill rejected: {reason}"))
            .await?;

        tracing::info!(
            skill_id,
            rejecter_id,
            certification = %updated.certification,
            "Skill rejected",
        );

        self.notify(&updated, CertificationNotice::Rejected { reason }).await;
        Ok(updated)
    }

    /// Soft rejection: the creator may resubmit and rerun certification.
    pub async fn request_changes(
        &self,
        skill_id: DbId,
        feedback: &str,
        actor_id: DbId,
    ) -> Result<Skill, CertificationError> {
        let feedback = require_text(feedback, "Feedback is required when requesting changes")?;
        let skill = self.find_skill(skill_id).await?;
        let status = skill.status().map_err(CertificationError::stored)?;

        if status == SkillStatus::ChangesRequested {
            return Err(CertificationError::Precondition(
                "Changes have already been requested for this skill".to_string(),
            ));
        }

        let updated = self
            .transition(
                skill_id,
                SkillTransition {
                    expected_status: Some(status),
                    status: Some(SkillStatus::ChangesRequested),
                    ..Default::default()
                },
            )
            .await?;

        // Closes the current review pass; the next run resets the entry.
        self.store
            .record_queue_decision(&RecordQueueDecision {
                skill_id,
                status: QueueStatus::Rejected,
                processed_by: actor_id,
                rejection_reason: Some(format!("Changes requested: {feedback}")),
            })
            .await?;

        self.close_pending_requests(skill_id, actor_id, &format!("Changes requested: {feedback}"))
            .await?;

        tracing::info!(skill_id, actor_id, "Changes requested");

        self.notify(&updated, CertificationNotice::ChangesRequested { feedback })
            .await;
        Ok(updated)
    }

    /// Grade one criterion for a skill (manual review or override).
    pub async fn record_check(
        &self,
        skill_id: DbId,
        criterion_id: DbId,
        status: CheckStatus,
        value: Option<String>,
        reviewer_id: DbId,
    ) -> Result<SkillCertificationCheck, CertificationError> {
        self.find_skill(skill_id).await?;
        let criterion = self.find_criterion(criterion_id).await?;

        let check = self
            .store
            .upsert_check(&UpsertCertificationCheck {
                skill_id,
                criterion_id,
                status,
                value,
                checked_by: Some(reviewer_id),
            })
            .await?;

        tracing::info!(
            skill_id,
            criterion = %criterion.name,
            status = %status,
            reviewer_id,
            "Certification check recorded",
        );
        Ok(check)
    }

    // -----------------------------------------------------------------------
    // Upgrade requests
    // -----------------------------------------------------------------------

    /// File a request for the next level.
    ///
    /// Requires a published skill, the immediately next tier (Silver or Gold),
    /// every auto-checkable criterion of that tier passing and no other
    /// pending request.
    pub async fn file_upgrade_request(
        &self,
        skill_id: DbId,
        level: CertificationLevel,
        requester_id: DbId,
    ) -> Result<CertificationRequest, CertificationError> {
        let skill = self.find_skill(skill_id).await?;
        let status = skill.status().map_err(CertificationError::stored)?;
        let current = skill.certification_level().map_err(CertificationError::stored)?;

        if status != SkillStatus::Published {
            return Err(CertificationError::Precondition(format!(
                "Only published skills can request certification, skill is '{status}'"
            )));
        }
        validate_upgrade_target(current, level)?;

        if self.store.find_pending_request(skill_id).await?.is_some() {
            return Err(CertificationError::Precondition(
                PENDING_REQUEST_MESSAGE.to_string(),
            ));
        }

        let progress = load_progress(self.store.as_ref(), &skill, false).await?;
        if !auto_criteria_pass(&progress) {
            let failing: Vec<&str> = progress
                .criteria_status
                .iter()
                .filter(|c| c.auto_checkable && c.status != CheckStatus::Passed)
                .map(|c| c.name.as_str())
                .collect();
            return Err(CertificationError::Precondition(format!(
                "Automatic {level} criteria not met: {}",
                failing.join(", ")
            )));
        }

        let request = self
            .store
            .create_request(&CreateCertificationRequest {
                skill_id,
                requested_level: level,
                requested_by: requester_id,
                quality_score_snapshot: skill.quality_score,
            })
            .await
            .map_err(|e| {
                if is_constraint_violation(&e, ONE_PENDING_CONSTRAINT) {
                    CertificationError::Precondition(PENDING_REQUEST_MESSAGE.to_string())
                } else {
                    CertificationError::Storage(e)
                }
            })?;

        tracing::info!(skill_id, request_id = request.id, level = %level, "Upgrade request filed");

        self.notify(&skill, CertificationNotice::RequestFiled { level })
            .await;
        Ok(request)
    }

    /// Approve or decline a pending upgrade request.
    ///
    /// The request is claimed before anything is granted, so two reviewers
    /// deciding the same request cannot both take effect. Approval checks the
    /// skill up front; a hierarchy violation leaves the request pending, and a
    /// grant that loses a race after the claim reopens it.
    pub async fn decide_upgrade_request(
        &self,
        request_id: DbId,
        approve: bool,
        reviewer_id: DbId,
        feedback: Option<String>,
    ) -> Result<CertificationRequest, CertificationError> {
        let request = self
            .store
            .find_request(request_id)
            .await?
            .ok_or(CertificationError::NotFound {
                entity: "CertificationRequest",
                id: request_id,
            })?;

        let request_status =
            RequestStatus::from_str_value(&request.status).map_err(CertificationError::stored)?;
        if request_status != RequestStatus::Pending {
            return Err(CertificationError::Precondition(format!(
                "Certification request {request_id} is already {request_status}"
            )));
        }
        let level = CertificationLevel::from_str_value(&request.requested_level)
            .map_err(CertificationError::stored)?;

        if approve {
            let skill = self.find_skill(request.skill_id).await?;
            ensure_certifiable(&skill, level)?;
        }

        let decided = self
            .store
            .decide_request(
                request_id,
                &DecideCertificationRequest {
                    status: if approve {
                        RequestStatus::Approved
                    } else {
                        RequestStatus::Rejected
                    },
                    reviewed_by: reviewer_id,
                    feedback: feedback.clone(),
                },
            )
            .await?
            .ok_or_else(|| {
                tracing::warn!(request_id, reviewer_id, "Upgrade request decided concurrently");
                CertificationError::Conflict(format!(
                    "Certification request {request_id} was decided concurrently"
                ))
            })?;

        if approve {
            if let Err(e) = self
                .certify_skill(request.skill_id, level, reviewer_id, feedback.clone())
                .await
            {
                self.reopen_request(request_id, reviewer_id).await;
                return Err(e);
            }
        }

        tracing::info!(
            request_id,
            skill_id = request.skill_id,
            approve,
            reviewer_id,
            "Upgrade request decided",
        );

        if !approve {
            let skill = self.find_skill(request.skill_id).await?;
            self.notify(
                &skill,
                CertificationNotice::RequestRejected { level, feedback },
            )
            .await;
        }
        Ok(decided)
    }

    /// Put a claimed approval back to pending; failures are only logged.
    async fn reopen_request(&self, request_id: DbId, reviewer_id: DbId) {
        match self.store.reopen_request(request_id, reviewer_id).await {
            Ok(Some(_)) => {
                tracing::info!(request_id, "Upgrade request reopened after failed grant");
            }
            Ok(None) => {
                tracing::warn!(request_id, "Upgrade request changed before it could be reopened");
            }
            Err(e) => {
                tracing::error!(request_id, error = %e, "Failed to reopen upgrade request");
            }
        }
    }

    async fn close_pending_requests(
        &self,
        skill_id: DbId,
        reviewer_id: DbId,
        feedback: &str,
    ) -> Result<(), CertificationError> {
        let closed = self
            .store
            .reject_pending_requests(skill_id, reviewer_id, feedback)
            .await?;
        if !closed.is_empty() {
            tracing::info!(skill_id, closed = closed.len(), "Pending upgrade requests closed");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn find_skill(&self, skill_id: DbId) -> Result<Skill, CertificationError> {
        self.store
            .find_skill(skill_id)
            .await?
            .ok_or(CertificationError::NotFound {
                entity: "Skill",
                id: skill_id,
            })
    }

    async fn find_criterion(
        &self,
        criterion_id: DbId,
    ) -> Result<CertificationCriterion, CertificationError> {
        self.store
            .find_criterion(criterion_id)
            .await?
            .ok_or(CertificationError::NotFound {
                entity: "CertificationCriterion",
                id: criterion_id,
            })
    }

    pub async fn history(&self, skill_id: DbId) -> Result<Vec<SkillCertification>, CertificationError> {
        self.find_skill(skill_id).await?;
        Ok(self.store.list_certifications(skill_id).await?)
    }

    pub async fn queue_entry(
        &self,
        skill_id: DbId,
    ) -> Result<ValidationQueueEntry, CertificationError> {
        self.store
            .find_queue_entry(skill_id)
            .await?
            .ok_or(CertificationError::NotFound {
                entity: "ValidationQueueEntry",
                id: skill_id,
            })
    }

    pub async fn criteria(
        &self,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, CertificationError> {
        Ok(self.store.list_criteria(level).await?)
    }

    pub async fn pending_requests(&self) -> Result<Vec<CertificationRequest>, CertificationError> {
        Ok(self.store.list_pending_requests().await?)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn transition(
        &self,
        skill_id: DbId,
        transition: SkillTransition,
    ) -> Result<Skill, CertificationError> {
        match self.store.apply_transition(skill_id, &transition).await? {
            Some(skill) => Ok(skill),
            None => {
                tracing::warn!(skill_id, ?transition, "Conditional skill update lost a race");
                Err(CertificationError::Conflict(CONFLICT_MESSAGE.to_string()))
            }
        }
    }

    async fn complete_run(
        &self,
        input: &CompleteValidationRun,
    ) -> Result<ValidationQueueEntry, CertificationError> {
        match self.store.complete_run(input).await? {
            Some(entry) => Ok(entry),
            None => {
                tracing::warn!(
                    skill_id = input.skill_id,
                    "Run outcome discarded, queue entry was decided during the run",
                );
                Err(CertificationError::Conflict(RUN_SUPERSEDED_MESSAGE.to_string()))
            }
        }
    }

    /// Deliver a notice; failures are logged and never fail the operation.
    async fn notify(&self, skill: &Skill, notice: CertificationNotice) {
        let notification = Notification {
            skill_id: skill.id,
            skill_name: skill.name.clone(),
            creator_id: skill.creator_id,
            notice,
        };
        if let Err(e) = self.notifier.notify(&notification).await {
            tracing::warn!(
                skill_id = skill.id,
                notice = notification.notice.kind(),
                error = %e,
                "Certification notice not delivered",
            );
        }
    }
}

/// Check that `skill` may be granted `level`; returns its current level.
fn ensure_certifiable(
    skill: &Skill,
    level: CertificationLevel,
) -> Result<CertificationLevel, CertificationError> {
    let status = skill.status().map_err(CertificationError::stored)?;
    if status != SkillStatus::Published {
        return Err(CertificationError::Precondition(format!(
            "Only published skills can be certified, skill is '{status}'"
        )));
    }
    let current = skill.certification_level().map_err(CertificationError::stored)?;
    validate_certify(current, level)?;
    Ok(current)
}

fn issues_json(issues: &[clawforge_core::bronze::ValidationIssue]) -> serde_json::Value {
    serde_json::to_value(issues).unwrap_or_else(|_| serde_json::json!([]))
}

fn require_text(value: &str, message: &str) -> Result<String, CertificationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CertificationError::Precondition(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn is_constraint_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
