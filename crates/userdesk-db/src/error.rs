//! Storage error types.

use thiserror::Error;
use userdesk_core::AppError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found.
    #[error("{entity_type} with id {id} not found")]
    NotFound { entity_type: &'static str, id: i64 },

    /// Unique constraint violation.
    #[error("{entity_type} with {field} '{value}' already exists")]
    Duplicate {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },

    /// Data rejected by a storage constraint, e.g. an unknown role id.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    #[must_use]
    pub const fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }

    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => AppError::not_found(err),
            StorageError::Duplicate { .. } => AppError::conflict(err),
            StorageError::InvalidData(_) => AppError::unprocessable(err),
            StorageError::Connection(_) | StorageError::Query(_) | StorageError::Migration(_) => {
                tracing::error!(error = %err, "Storage failure");
                AppError::internal(err)
            }
        }
    }
}
