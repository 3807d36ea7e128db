//! Repository for the `certification_criteria` catalog.

use sqlx::PgPool;
use clawforge_core::certification::CertificationLevel;
use clawforge_core::types::DbId;

use crate::models::certification_criteria::CertificationCriterion;

const COLUMNS: &str =
    "id, level, name, description, auto_checkable, weight, sort_order, created_at, updated_at";

pub struct CertificationCriteriaRepo;

impl CertificationCriteriaRepo {
    /// Criteria of one level, in display order.
    pub async fn list_by_level(
        pool: &PgPool,
        level: CertificationLevel,
    ) -> Result<Vec<CertificationCriterion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certification_criteria
             WHERE level = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, CertificationCriterion>(&query)
            .bind(level.as_str())
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CertificationCriterion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM certification_criteria
             ORDER BY level ASC, sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, CertificationCriterion>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CertificationCriterion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM certification_criteria WHERE id = $1");
        sqlx::query_as::<_, CertificationCriterion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
