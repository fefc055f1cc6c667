use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinTrackError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Not found: {kind} #{id}")]
    NotFound { kind: String, id: u64 },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FinTrackError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FinTrackError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FinTrackError {
    fn from(e: serde_json::Error) -> Self {
        FinTrackError::SerializationError(e.to_string())
    }
}
