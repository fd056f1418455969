//! Solver options and method selection.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Integration method selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Method {
    /// Adaptive Dormand-Prince 5(4) with local error control (default;
    /// 6 derivative calls per step, the 7th stage is shared with the next).
    #[default]
    DormandPrince45,
    /// Classic 4th-order Runge-Kutta with a fixed step (4 calls per step).
    Rk4 {
        /// Fixed step size (seconds)
        step: f64,
    },
}

/// Options for one trajectory integration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Integration method
    pub method: Method,
    /// Relative tolerance on the local error estimate
    pub rtol: f64,
    /// Absolute tolerance on the local error estimate
    pub atol: f64,
    /// Initial step size; None derives one from the derivative magnitude
    pub h0: Option<f64>,
    /// Upper bound on the internal step; None allows the whole span
    pub max_step: Option<f64>,
    /// Floor below which the step size counts as collapsed
    pub min_step: f64,
    /// Safety limit on total internal steps, accepted plus rejected
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            rtol: 1e-3,
            atol: 1e-6,
            h0: None,
            max_step: None,
            min_step: 1e-14,
            max_steps: 100_000,
        }
    }
}

impl SolverOptions {
    /// Override both tolerances.
    pub fn with_tolerances(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Select the integration method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Reject nonsensical settings before any stepping happens.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.rtol > 0.0 && self.rtol.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "rtol must be positive and finite",
            });
        }
        if !(self.atol > 0.0 && self.atol.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "atol must be positive and finite",
            });
        }
        if let Some(h0) = self.h0 {
            if !(h0 > 0.0 && h0.is_finite()) {
                return Err(SimError::InvalidArg {
                    what: "initial step must be positive and finite",
                });
            }
        }
        if let Some(max_step) = self.max_step {
            if !(max_step > 0.0 && max_step.is_finite()) {
                return Err(SimError::InvalidArg {
                    what: "max step must be positive and finite",
                });
            }
        }
        if !(self.min_step > 0.0 && self.min_step.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "min step must be positive and finite",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max steps must be at least 1",
            });
        }
        if let Method::Rk4 { step } = self.method {
            if !(step > 0.0 && step.is_finite()) {
                return Err(SimError::InvalidArg {
                    what: "fixed step must be positive and finite",
                });
            }
        }
        Ok(())
    }
}
