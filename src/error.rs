//! Error types.
//!
//! `AppError` is the top-level carrier returned to `main`: it pairs a message
//! with the process exit code. The typed errors below describe the two
//! failure families callers may want to match on (applicant validation and
//! classifier artifacts); both convert into `AppError`.

use thiserror::Error;

/// Exit code for bad input or configuration.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when no usable data remains.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for runtime, model and terminal failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A rejected applicant attribute.
///
/// Every variant names the offending field so the caller can point the
/// analyst at the input to correct.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("`{field}` must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },

    #[error("`{field}` is missing")]
    Missing { field: &'static str },

    #[error("`{field}` has unrecognized value '{value}' (expected one of: {allowed})")]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("`{field}` value '{value}' was not seen when the model was trained")]
    UnseenByModel { field: &'static str, value: String },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::new(EXIT_INPUT, format!("Invalid applicant input: {err}"))
    }
}

/// Failure to load or invoke the classifier artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to open model artifact '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported model format '{0}'")]
    Format(String),

    #[error("model feature schema mismatch at position {position}: expected `{expected}`, artifact declares `{found}`")]
    SchemaMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("model artifact declares {found} features, expected {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("model artifact is missing parameters for `{0}`")]
    MissingFeature(String),

    #[error("model parameter for `{0}` is not usable (non-finite value or zero scale)")]
    BadParameter(String),

    #[error("model produced an invalid probability: {0}")]
    BadProbability(f64),
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::new(EXIT_RUNTIME, format!("Model error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_field() {
        let err = ValidationError::NonPositive {
            field: "person_income",
            value: 0.0,
        };
        assert!(err.to_string().contains("person_income"));

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_INPUT);
        assert!(app.to_string().contains("person_income"));
    }

    #[test]
    fn model_error_maps_to_runtime_exit() {
        let app: AppError = ModelError::Format("pickle".to_string()).into();
        assert_eq!(app.exit_code(), EXIT_RUNTIME);
    }
}
