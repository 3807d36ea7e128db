//! Persistence seam of the certification pipeline.
//!
//! [`CertificationStore`] lists exactly the reads and writes the orchestrator
//! and resolver perform. [`PgCertificationStore`] delegates each method to the
//! corresponding repository.

use async_trait::async_trait;
use sqlx::PgPool;
use clawforge_core::certification::CertificationLevel;
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
use clawforge_db::repositories::{
    CertificationCheckRepo, CertificationCriteriaRepo, CertificationRequestRepo,
    SkillCertificationRepo, SkillRepo, ValidationQueueRepo,
};

#[async_trait]
pub trait CertificationStore: Send + Sync {
    // -- skills -----------------------------------------------------------

    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, sqlx::Error>;

    /// Conditional update; `None` when the row is missing or no longer matches.
    async fn apply_transition(
        &self,
        id: DbId,
        transition: &SkillTransition,
    ) -> Result<Option<Skill>, sqlx::Error>;

    async fn update_quality_score(&self, id: DbId, quality_score: i32) -> Result<(), sqlx::Error>;

    // -- validation queue -------------------------------------------------

    /// Claim the entry for a run; `None` when the skill moved on or another
    /// run holds the claim.
    async fn mark_processing(
        &self,
        input: &ClaimValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error>;

    /// Write a run's outcome; `None` when the entry is no longer `processing`.
    async fn complete_run(
        &self,
        input: &CompleteValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error>;

    async fn record_queue_decision(
        &self,
        input: &RecordQueueDecision,
    ) -> Result<ValidationQueueEntry, sqlx::Error>;

    async fn find_queue_entry(
        &self,
        skill_id: DbId,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error>;

    // -- history ----------------------------------------------------------

    async fn append_certification(
        &self,
        input: &CreateSkillCertification,
    ) -> Result<SkillCertification, sqlx::Error>;

    async fn list_certifications(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertification>, sqlx::Error>;

    // -- criteria and checks ----------------------------------------------

    async fn list_criteria(
        &self,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, sqlx::Error>;

    async fn find_criterion(&self, id: DbId)
        -> Result<Option<CertificationCriterion>, sqlx::Error>;

    async fn list_checks(&self, skill_id: DbId)
        -> Result<Vec<SkillCertificationCheck>, sqlx::Error>;

    async fn upsert_check(
        &self,
        input: &UpsertCertificationCheck,
    ) -> Result<SkillCertificationCheck, sqlx::Error>;

    // -- upgrade requests -------------------------------------------------

    async fn find_request(&self, id: DbId) -> Result<Option<CertificationRequest>, sqlx::Error>;

    async fn find_pending_request(
        &self,
        skill_id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error>;

    async fn list_pending_requests(&self) -> Result<Vec<CertificationRequest>, sqlx::Error>;

    async fn create_request(
        &self,
        input: &CreateCertificationRequest,
    ) -> Result<CertificationRequest, sqlx::Error>;

    /// Close a pending request; `None` when it was already decided.
    async fn decide_request(
        &self,
        id: DbId,
        input: &DecideCertificationRequest,
    ) -> Result<Option<CertificationRequest>, sqlx::Error>;

    async fn reject_pending_requests(
        &self,
        skill_id: DbId,
        reviewed_by: DbId,
        feedback: &str,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error>;

    /// Undo an approval claimed by `reviewed_by`; `None` when it was not theirs.
    async fn reopen_request(
        &self,
        id: DbId,
        reviewed_by: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error>;
}

/// [`CertificationStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCertificationStore {
    pool: PgPool,
}

impl PgCertificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CertificationStore for PgCertificationStore {
    async fn find_skill(&self, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        SkillRepo::find_by_id(&self.pool, id).await
    }

    async fn apply_transition(
        &self,
        id: DbId,
        transition: &SkillTransition,
    ) -> Result<Option<Skill>, sqlx::Error> {
        SkillRepo::apply_transition(&self.pool, id, transition).await
    }

    async fn update_quality_score(&self, id: DbId, quality_score: i32) -> Result<(), sqlx::Error> {
        SkillRepo::update_quality_score(&self.pool, id, quality_score).await?;
        Ok(())
    }

    async fn mark_processing(
        &self,
        input: &ClaimValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        ValidationQueueRepo::mark_processing(&self.pool, input).await
    }

    async fn complete_run(
        &self,
        input: &CompleteValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        ValidationQueueRepo::complete_run(&self.pool, input).await
    }

    async fn record_queue_decision(
        &self,
        input: &RecordQueueDecision,
    ) -> Result<ValidationQueueEntry, sqlx::Error> {
        ValidationQueueRepo::record_decision(&self.pool, input).await
    }

    async fn find_queue_entry(
        &self,
        skill_id: DbId,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        ValidationQueueRepo::find_by_skill(&self.pool, skill_id).await
    }

    async fn append_certification(
        &self,
        input: &CreateSkillCertification,
    ) -> Result<SkillCertification, sqlx::Error> {
        SkillCertificationRepo::create(&self.pool, input).await
    }

    async fn list_certifications(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertification>, sqlx::Error> {
        SkillCertificationRepo::list_for_skill(&self.pool, skill_id).await
    }

    async fn list_criteria(
        &self,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, sqlx::Error> {
        CertificationCriteriaRepo::list_by_level(&self.pool, level).await
    }

    async fn find_criterion(
        &self,
        id: DbId,
    ) -> Result<Option<CertificationCriterion>, sqlx::Error> {
        CertificationCriteriaRepo::find_by_id(&self.pool, id).await
    }

    async fn list_checks(
        &self,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertificationCheck>, sqlx::Error> {
        CertificationCheckRepo::list_for_skill(&self.pool, skill_id).await
    }

    async fn upsert_check(
        &self,
        input: &UpsertCertificationCheck,
    ) -> Result<SkillCertificationCheck, sqlx::Error> {
        CertificationCheckRepo::upsert(&self.pool, input).await
    }

    async fn find_request(&self, id: DbId) -> Result<Option<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::find_by_id(&self.pool, id).await
    }

    async fn find_pending_request(
        &self,
        skill_id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::find_pending_for_skill(&self.pool, skill_id).await
    }

    async fn list_pending_requests(&self) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::list_pending(&self.pool).await
    }

    async fn create_request(
        &self,
        input: &CreateCertificationRequest,
    ) -> Result<CertificationRequest, sqlx::Error> {
        CertificationRequestRepo::create(&self.pool, input).await
    }

    async fn decide_request(
        &self,
        id: DbId,
        input: &DecideCertificationRequest,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::decide(&self.pool, id, input).await
    }

    async fn reject_pending_requests(
        &self,
        skill_id: DbId,
        reviewed_by: DbId,
        feedback: &str,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::reject_pending_for_skill(&self.pool, skill_id, reviewed_by, feedback)
            .await
    }

    async fn reopen_request(
        &self,
        id: DbId,
        reviewed_by: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        CertificationRequestRepo::reopen(&self.pool, id, reviewed_by).await
    }
}
