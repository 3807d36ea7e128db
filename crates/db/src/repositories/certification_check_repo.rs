//! Repository for the `skill_certification_checks` table.

use sqlx::PgPool;
use clawforge_core::types::DbId;

use crate::models::certification_check::{SkillCertificationCheck, UpsertCertificationCheck};

const COLUMNS: &str = "id, skill_id, criterion_id, status, value, checked_by, checked_at, \
    created_at, updated_at";

pub struct CertificationCheckRepo;

impl CertificationCheckRepo {
    pub async fn list_for_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertificationCheck>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skill_certification_checks
             WHERE skill_id = $1
             ORDER BY criterion_id ASC"
        );
        sqlx::query_as::<_, SkillCertificationCheck>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite the check for one (skill, criterion) pair.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertCertificationCheck,
    ) -> Result<SkillCertificationCheck, sqlx::Error> {
        let query = format!(
            "INSERT INTO skill_certification_checks
                (skill_id, criterion_id, status, value, checked_by, checked_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             ON CONFLICT (skill_id, criterion_id) DO UPDATE SET
                status = EXCLUDED.status,
                value = EXCLUDED.value,
                checked_by = EXCLUDED.checked_by,
                checked_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SkillCertificationCheck>(&query)
            .bind(input.skill_id)
            .bind(input.criterion_id)
            .bind(input.status.as_str())
            .bind(&input.value)
            .bind(input.checked_by)
            .fetch_one(pool)
            .await
    }
}
