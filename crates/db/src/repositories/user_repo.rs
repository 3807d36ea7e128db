//! Repository for the `users` table.

use sqlx::PgPool;
use clawforge_core::roles::ROLE_CREATOR;
use clawforge_core::types::DbId;

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, email, display_name, role, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user. The role defaults to `creator`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, display_name, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(input.role.as_deref().unwrap_or(ROLE_CREATOR))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
