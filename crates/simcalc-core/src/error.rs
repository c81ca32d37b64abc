use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "No break-even point: unit price {unit_price} does not exceed unit variable cost {unit_variable_cost}"
    )]
    NoBreakEven {
        unit_price: Decimal,
        unit_variable_cost: Decimal,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SimCalcError {
    /// Shorthand for the most common rejection.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        SimCalcError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SimCalcError {
    fn from(e: serde_json::Error) -> Self {
        SimCalcError::SerializationError(e.to_string())
    }
}
