//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clawforge_core::error::CoreError;
use clawforge_core::types::DbId;
use clawforge_db::models::skill::Skill;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub role: String,
    /// Admin or agent: may take certification decisions on any skill.
    pub is_reviewer: bool,
}

impl AuthUser {
    /// Reviewers see every skill; creators only their own.
    pub fn ensure_can_access(&self, skill: &Skill) -> Result<(), AppError> {
        if self.is_reviewer || skill.creator_id == self.user_id {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "Only the skill's creator or a reviewer may access its certification".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            is_reviewer: claims.is_reviewer(),
            role: claims.role,
        })
    }
}
