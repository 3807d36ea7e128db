//! Repository for the `certification_requests` table.
//!
//! A partial unique index allows at most one `pending` request per skill;
//! a concurrent second filing surfaces as a unique violation from
//! [`CertificationRequestRepo::create`].

use sqlx::PgPool;
use clawforge_core::certification::RequestStatus;
use clawforge_core::types::DbId;

use crate::models::certification_request::{
    CertificationRequest, CreateCertificationRequest, DecideCertificationRequest,
};

const COLUMNS: &str = "id, skill_id, requested_level, requested_by, quality_score_snapshot, \
    status, reviewed_by, reviewed_at, feedback, created_at, updated_at";

pub struct CertificationRequestRepo;

impl CertificationRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateCertificationRequest,
    ) -> Result<CertificationRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO certification_requests
                (skill_id, requested_level, requested_by, quality_score_snapshot)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(input.skill_id)
            .bind(input.requested_level.as_str())
            .bind(input.requested_by)
            .bind(input.quality_score_snapshot)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certification_requests WHERE id = $1");
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_pending_for_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certification_requests
             WHERE skill_id = $1 AND status = $2"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(skill_id)
            .bind(RequestStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Pending requests across all skills, oldest first (review queue order).
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certification_requests
             WHERE status = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(RequestStatus::Pending.as_str())
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certification_requests
             WHERE skill_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// Close a request that is still pending.
    ///
    /// Returns `None` if the request does not exist or was already decided.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        input: &DecideCertificationRequest,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE certification_requests SET
                status = $2,
                reviewed_by = $3,
                reviewed_at = NOW(),
                feedback = $4
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(id)
            .bind(input.status.as_str())
            .bind(input.reviewed_by)
            .bind(&input.feedback)
            .bind(RequestStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Close every pending request of a skill as `rejected`.
    pub async fn reject_pending_for_skill(
        pool: &PgPool,
        skill_id: DbId,
        reviewed_by: DbId,
        feedback: &str,
    ) -> Result<Vec<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE certification_requests SET
                status = $4,
                reviewed_by = $2,
                reviewed_at = NOW(),
                feedback = $3
             WHERE skill_id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(skill_id)
            .bind(reviewed_by)
            .bind(feedback)
            .bind(RequestStatus::Rejected.as_str())
            .bind(RequestStatus::Pending.as_str())
            .fetch_all(pool)
            .await
    }

    /// Put an approval back to `pending` after the grant it claimed failed.
    pub async fn reopen(
        pool: &PgPool,
        id: DbId,
        reviewed_by: DbId,
    ) -> Result<Option<CertificationRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE certification_requests SET
                status = $3,
                reviewed_by = NULL,
                reviewed_at = NULL,
                feedback = NULL
             WHERE id = $1 AND status = $4 AND reviewed_by = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CertificationRequest>(&query)
            .bind(id)
            .bind(reviewed_by)
            .bind(RequestStatus::Pending.as_str())
            .bind(RequestStatus::Approved.as_str())
            .fetch_optional(pool)
            .await
    }
}
