//! Error types for trajectory integration.

use sm_model::ModelError;
use thiserror::Error;

/// Errors encountered while building inputs for or running an integration.
#[derive(Error, Debug, Clone)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Sample time {t} outside time span [{t_start}, {t_end}]")]
    SampleOutOfSpan { t: f64, t_start: f64, t_end: f64 },

    #[error("Step size underflow at t = {t}: h = {h:.3e}")]
    StepSizeUnderflow {
        t: f64,
        h: f64,
        last_state: Vec<f64>,
    },

    #[error("Exceeded {max_steps} steps at t = {t}")]
    MaxStepsExceeded {
        t: f64,
        max_steps: usize,
        last_state: Vec<f64>,
    },

    #[error("Model error: {source}")]
    Model { source: ModelError },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Furthest successfully reached (time, state), for integration failures.
    pub fn last_reached(&self) -> Option<(f64, &[f64])> {
        match self {
            SimError::StepSizeUnderflow { t, last_state, .. } => Some((*t, last_state)),
            SimError::MaxStepsExceeded { t, last_state, .. } => Some((*t, last_state)),
            _ => None,
        }
    }
}

impl From<ModelError> for SimError {
    fn from(e: ModelError) -> Self {
        SimError::Model { source: e }
    }
}
