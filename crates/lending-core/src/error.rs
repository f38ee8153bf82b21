use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LendingError {
    #[error("Principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    #[error("Term length must be at least 1 period, got {0}")]
    InvalidTerm(u32),

    #[error("Negative rate: {field} = {value}")]
    NegativeRate { field: String, value: Decimal },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LendingError {
    fn from(e: serde_json::Error) -> Self {
        LendingError::SerializationError(e.to_string())
    }
}
