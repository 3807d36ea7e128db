//! Role-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects with 403 when the role does
//! not qualify.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use clawforge_core::error::CoreError;
use clawforge_core::roles::{ROLE_ADMIN, ROLE_CREATOR};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `admin` or `agent`: may certify, reject, grade and decide requests.
///
/// ```ignore
/// async fn certify(RequireReviewer(user): RequireReviewer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireReviewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireReviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_reviewer {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or Agent role required".into(),
            )));
        }
        Ok(RequireReviewer(user))
    }
}

/// Requires `creator` or `admin`.
pub struct RequireCreator(pub AuthUser);

impl FromRequestParts<AppState> for RequireCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_CREATOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Creator or Admin role required".into(),
            )));
        }
        Ok(RequireCreator(user))
    }
}
