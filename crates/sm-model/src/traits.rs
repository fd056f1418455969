//! StateSpaceModel trait for systems in first-order form.

use crate::error::ModelResult;

/// Trait for dynamical systems written as x_dot = f(t, x).
///
/// `N` is the state dimension. Implementations must be pure: the derivative
/// is a deterministic function of (t, y) with no side effects, so the
/// integrator may evaluate it at trial points it later discards, and two
/// integrations of the same model produce bit-for-bit identical results.
pub trait StateSpaceModel<const N: usize> {
    /// Compute the state derivative dy/dt = f(t, y).
    ///
    /// `t` is part of the contract for generality; time-invariant models
    /// ignore it.
    fn derivative(&self, t: f64, y: &[f64; N]) -> ModelResult<[f64; N]>;
}
