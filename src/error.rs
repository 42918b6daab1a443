use thiserror::Error;

/// Engine error types.
///
/// Detectors and scorers never fail on thin or flat data; they return
/// sentinels instead. Errors are raised only where input crosses the library
/// boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Non-finite {field} in {context} at index {index}")]
    NonFinite {
        context: String,
        index: usize,
        field: &'static str,
    },

    #[error("Negative {field} in {context} at index {index}")]
    NegativeValue {
        context: String,
        index: usize,
        field: &'static str,
    },

    #[error("Unknown strategy modality: {0}")]
    UnknownModality(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
