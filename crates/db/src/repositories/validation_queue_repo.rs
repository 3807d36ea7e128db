//! Repository for the `validation_queue` table (one row per skill).

use sqlx::PgPool;
use clawforge_core::certification::QueueStatus;
use clawforge_core::types::DbId;

use crate::models::validation_queue::{
    ClaimValidationRun, CompleteValidationRun, RecordQueueDecision, ValidationQueueEntry,
};

const COLUMNS: &str = "id, skill_id, status, bronze_score, silver_score, score_breakdown, \
    bronze_errors, bronze_warnings, archive_sha256, rejection_reason, processed_by, \
    processed_at, created_at, updated_at";

pub struct ValidationQueueRepo;

impl ValidationQueueRepo {
    /// Claim the entry for a run and reset it to `processing`, clearing the
    /// results of any earlier run.
    ///
    /// Returns `None` (and writes nothing) when the skill no longer holds the
    /// expected status/certification or another run holds a live claim.
    pub async fn mark_processing(
        pool: &PgPool,
        input: &ClaimValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO validation_queue (skill_id, status)
             SELECT s.id, $2 FROM skills s
             WHERE s.id = $1 AND s.status = $3 AND s.certification = $4
             ON CONFLICT (skill_id) DO UPDATE SET
                status = EXCLUDED.status,
                bronze_score = NULL,
                silver_score = NULL,
                score_breakdown = NULL,
                bronze_errors = '[]'::jsonb,
                bronze_warnings = '[]'::jsonb,
                archive_sha256 = NULL,
                rejection_reason = NULL,
                processed_by = NULL,
                processed_at = NULL
             WHERE validation_queue.status <> EXCLUDED.status
                OR validation_queue.updated_at < NOW() - $5::FLOAT8 * INTERVAL '1 second'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationQueueEntry>(&query)
            .bind(input.skill_id)
            .bind(QueueStatus::Processing.as_str())
            .bind(input.expected_status.as_str())
            .bind(input.expected_certification.as_str())
            .bind(input.stale_after_secs as f64)
            .fetch_optional(pool)
            .await
    }

    /// Write the outcome of an automated run over the entry it claimed.
    ///
    /// Returns `None` when the entry left `processing` in the meantime, i.e.
    /// a reviewer decision landed while the run was in flight.
    pub async fn complete_run(
        pool: &PgPool,
        input: &CompleteValidationRun,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE validation_queue SET
                status = $2,
                bronze_score = $3,
                silver_score = $4,
                score_breakdown = $5,
                bronze_errors = $6,
                bronze_warnings = $7,
                archive_sha256 = $8,
                rejection_reason = $9,
                processed_by = NULL,
                processed_at = NOW()
             WHERE skill_id = $1 AND status = $10
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationQueueEntry>(&query)
            .bind(input.skill_id)
            .bind(input.status.as_str())
            .bind(input.bronze_score)
            .bind(input.silver_score)
            .bind(&input.score_breakdown)
            .bind(&input.bronze_errors)
            .bind(&input.bronze_warnings)
            .bind(&input.archive_sha256)
            .bind(&input.rejection_reason)
            .bind(QueueStatus::Processing.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Record a reviewer decision, keeping the scores of the last run.
    pub async fn record_decision(
        pool: &PgPool,
        input: &RecordQueueDecision,
    ) -> Result<ValidationQueueEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO validation_queue (skill_id, status, rejection_reason, processed_by, processed_at)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT (skill_id) DO UPDATE SET
                status = EXCLUDED.status,
                rejection_reason = EXCLUDED.rejection_reason,
                processed_by = EXCLUDED.processed_by,
                processed_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ValidationQueueEntry>(&query)
            .bind(input.skill_id)
            .bind(input.status.as_str())
            .bind(&input.rejection_reason)
            .bind(input.processed_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Option<ValidationQueueEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM validation_queue WHERE skill_id = $1");
        sqlx::query_as::<_, ValidationQueueEntry>(&query)
            .bind(skill_id)
            .fetch_optional(pool)
            .await
    }

    /// Entries in a given status, oldest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: QueueStatus,
    ) -> Result<Vec<ValidationQueueEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM validation_queue
             WHERE status = $1
             ORDER BY updated_at ASC, id ASC"
        );
        sqlx::query_as::<_, ValidationQueueEntry>(&query)
            .bind(status.as_str())
            .fetch_all(pool)
            .await
    }
}
