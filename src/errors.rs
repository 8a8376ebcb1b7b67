use crate::sheets::SheetError;
use crate::storage::StorageError;

/// Crate-wide service error taxonomy.
///
/// Adapter and storage failures are wrapped rather than flattened so the
/// sync pipeline can route them to the `error` phase with their original
/// user-facing message intact. Row-level validation failures are NOT
/// errors; they accumulate as `RowValidationError` records on the preview.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    /// Returns the message suitable for end users.
    ///
    /// Adapter errors carry actionable guidance ("publish the sheet",
    /// "check the URL"); internal errors collapse to a generic message so
    /// implementation details never reach the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Sheet(err) => err.user_message().to_string(),
            Self::Storage(_) | Self::SerializationError(_) | Self::InternalError(_) => {
                "Something went wrong while saving data. Your previous data is unchanged."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_internal_details() {
        let err = ServiceError::InternalError("poisoned lock in sync service".into());
        assert!(!err.user_message().contains("poisoned"));

        let err = ServiceError::Storage(StorageError::OperationFailed("disk full".into()));
        assert!(!err.user_message().contains("disk full"));
    }

    #[test]
    fn user_message_passes_through_actionable_errors() {
        let err = ServiceError::ValidationFailed("no valid product rows".into());
        assert!(err.user_message().contains("no valid product rows"));

        let err = ServiceError::Sheet(SheetError::NotPublic);
        assert!(err.user_message().to_lowercase().contains("publish"));
    }
}
