//! Error taxonomy for the prediction pipeline

use thiserror::Error;

/// Errors raised while loading data, fitting, or predicting.
///
/// Loader and fitting errors are fatal for the session: the static dataset
/// cannot become valid by retrying. `InvalidCategory` and `InvalidInput`
/// only reject a single evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitTrackError {
    #[error("data unavailable from {source_name}: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    #[error("{source_name}: column `{column}` at line {line} holds {value:?}, expected a number")]
    SchemaMismatch {
        source_name: String,
        column: String,
        line: usize,
        value: String,
    },

    #[error("need at least {required} records to fit a model, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("feature row has {actual} values, model was trained on {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("unrecognized gender {0:?}, expected male or female")]
    InvalidCategory(String),

    #[error("{field} must be a finite number, got {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

impl FitTrackError {
    /// Shorthand for a `DataUnavailable` error.
    pub fn unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        FitTrackError::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may correct its input and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FitTrackError::InvalidCategory(_) | FitTrackError::InvalidInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FitTrackError>;

/// Reject NaN and infinities.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FitTrackError::InvalidInput { field, value })
    }
}
