pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "export")]
pub mod export;

#[cfg(feature = "rate_lookup")]
pub mod rate_lookup;

pub use error::AmortizationError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortizationResult<T> = Result<T, AmortizationError>;
