use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortizationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Calculation failure in {context}")]
    CalculationFailure { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Export failure: {0}")]
    ExportFailure(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmortizationError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        AmortizationError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        AmortizationError::CalculationFailure {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<rust_xlsxwriter::XlsxError> for AmortizationError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AmortizationError::ExportFailure(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<csv::Error> for AmortizationError {
    fn from(e: csv::Error) -> Self {
        AmortizationError::ExportFailure(e.to_string())
    }
}

#[cfg(feature = "export")]
impl From<std::io::Error> for AmortizationError {
    fn from(e: std::io::Error) -> Self {
        AmortizationError::ExportFailure(e.to_string())
    }
}
