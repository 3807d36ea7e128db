use crate::types::DbId;

/// Domain failure shared by every crate.
///
/// The pipeline folds these into its own `CertificationError`; the API maps
/// them straight to HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input or a broken certification rule (hierarchy, status).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unreadable stored data, e.g. an unknown auto-check in the catalog.
    #[error("Internal error: {0}")]
    Internal(String),
}
