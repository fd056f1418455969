//! Error types for model evaluation.

use sm_core::CoreError;
use thiserror::Error;

/// Errors raised while validating parameters or evaluating a model.
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    #[error("Non-physical parameter: {what}")]
    NonPhysical { what: &'static str },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl From<CoreError> for ModelError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, value } => ModelError::NonFinite { what, value },
            CoreError::InvalidArg { what } => ModelError::NonPhysical { what },
        }
    }
}
