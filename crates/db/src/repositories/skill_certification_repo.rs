//! Repository for the append-only `skill_certifications` history.

use sqlx::PgPool;
use clawforge_core::types::DbId;

use crate::models::skill_certification::{CreateSkillCertification, SkillCertification};

const COLUMNS: &str = "id, skill_id, level, granted_by, notes, score_snapshot, created_at, updated_at";

pub struct SkillCertificationRepo;

impl SkillCertificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSkillCertification,
    ) -> Result<SkillCertification, sqlx::Error> {
        let query = format!(
            "INSERT INTO skill_certifications (skill_id, level, granted_by, notes, score_snapshot)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SkillCertification>(&query)
            .bind(input.skill_id)
            .bind(input.level.as_str())
            .bind(input.granted_by)
            .bind(&input.notes)
            .bind(&input.score_snapshot)
            .fetch_one(pool)
            .await
    }

    /// Full history for a skill, newest first.
    pub async fn list_for_skill(
        pool: &PgPool,
        skill_id: DbId,
    ) -> Result<Vec<SkillCertification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM skill_certifications
             WHERE skill_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SkillCertification>(&query)
            .bind(skill_id)
            .fetch_all(pool)
            .await
    }
}
