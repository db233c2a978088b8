use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RefinanceError {
    fn from(e: serde_json::Error) -> Self {
        RefinanceError::SerializationError(e.to_string())
    }
}

impl RefinanceError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RefinanceError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
