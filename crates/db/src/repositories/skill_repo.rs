//! Repository for the `skills` table.
//!
//! Status and certification changes go through [`SkillRepo::apply_transition`],
//! a single conditional `UPDATE` that only succeeds while the row still holds
//! the expected values. Concurrent reviewers therefore cannot both apply a
//! transition computed from the same snapshot.

use sqlx::PgPool;
use clawforge_core::certification::SkillStatus;
use clawforge_core::types::DbId;

use crate::models::skill::{CreateSkill, Skill, SkillTransition};

const COLUMNS: &str = "id, creator_id, name, archive_url, status, certification, \
    quality_score, sales_count, average_rating, published_at, certified_at, \
    created_at, updated_at";

pub struct SkillRepo;

impl SkillRepo {
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (creator_id, name, archive_url, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(input.creator_id)
            .bind(&input.name)
            .bind(&input.archive_url)
            .bind(
                input
                    .status
                    .as_deref()
                    .unwrap_or(SkillStatus::Draft.as_str()),
            )
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE id = $1");
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a guarded status/certification change.
    ///
    /// Returns `None` when the row does not exist or no longer matches the
    /// expected status/certification. `certified_at` is cleared when the
    /// certification drops to `none` and stamped whenever it changes.
    pub async fn apply_transition(
        pool: &PgPool,
        id: DbId,
        transition: &SkillTransition,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!(
            "UPDATE skills SET
                status = COALESCE($4, status),
                certification = COALESCE($5, certification),
                certified_at = CASE
                    WHEN $5::TEXT IS NULL OR $5 = certification THEN certified_at
                    WHEN $5 = 'none' THEN NULL
                    ELSE NOW()
                END,
                published_at = CASE
                    WHEN $6 THEN COALESCE(published_at, NOW())
                    ELSE published_at
                END
             WHERE id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR certification = $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(id)
            .bind(transition.expected_status.map(|s| s.as_str()))
            .bind(transition.expected_certification.map(|c| c.as_str()))
            .bind(transition.status.map(|s| s.as_str()))
            .bind(transition.certification.map(|c| c.as_str()))
            .bind(transition.mark_published)
            .fetch_optional(pool)
            .await
    }

    /// Store the latest aggregate quality score (0..=100).
    pub async fn update_quality_score(
        pool: &PgPool,
        id: DbId,
        quality_score: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE skills SET quality_score = $2 WHERE id = $1")
            .bind(id)
            .bind(quality_score.clamp(0, 100))
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
