use clawforge_core::error::CoreError;
use clawforge_core::types::DbId;

/// Typed failure of a certification operation.
///
/// Raw persistence errors only appear wrapped in [`CertificationError::Storage`].
#[derive(Debug, thiserror::Error)]
pub enum CertificationError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Wrong status, hierarchy violation or duplicate pending request.
    #[error("{0}")]
    Precondition(String),

    /// The skill changed between read and conditional write.
    #[error("{0}")]
    Conflict(String),

    /// The stored catalog or data cannot be interpreted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<CoreError> for CertificationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            CoreError::Validation(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Forbidden(msg) => Self::Precondition(msg),
            CoreError::Conflict(msg) => Self::Conflict(msg),
            CoreError::Internal(msg) => Self::Configuration(msg),
        }
    }
}

impl CertificationError {
    /// Stored values that fail to parse are data problems, not caller mistakes.
    pub(crate) fn stored(err: CoreError) -> Self {
        Self::Configuration(err.to_string())
    }
}
