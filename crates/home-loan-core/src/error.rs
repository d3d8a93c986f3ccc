use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid scenario: {field} — {reason}")]
    InvalidScenario { field: String, reason: String },

    #[error("Payment insufficient to amortize: monthly payment {monthly_payment} (interest-only payment {interest_only_payment}) does not reach a zero balance within {max_iterations} months")]
    NonConvergentPayment {
        monthly_payment: Decimal,
        interest_only_payment: Decimal,
        max_iterations: u32,
    },

    #[error("Arithmetic overflow: {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidScenario {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        LoanError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::SerializationError(e.to_string())
    }
}
