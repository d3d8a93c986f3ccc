pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::LoanError;
pub use types::*;

/// Standard result type for all home-loan operations
pub type LoanResult<T> = Result<T, LoanError>;
