//! Damped spring-mass oscillator in state-space form.

use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};
use sm_core::numeric::{ensure_finite, ensure_positive};
use sm_core::units::{Accel, Damping, Energy, Force, Length, Mass, Stiffness, Velocity};
use sm_core::units::{kg, m, mps, n, n_per_m, n_s_per_m};

use crate::error::{ModelError, ModelResult};
use crate::traits::StateSpaceModel;

/// Instantaneous mechanical state in SI base units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Position (m)
    pub position: f64,
    /// Velocity (m/s)
    pub velocity: f64,
}

impl State {
    pub fn new(position: f64, velocity: f64) -> Self {
        Self { position, velocity }
    }
}

impl From<[f64; 2]> for State {
    fn from(y: [f64; 2]) -> Self {
        Self {
            position: y[0],
            velocity: y[1],
        }
    }
}

impl From<State> for [f64; 2] {
    fn from(s: State) -> Self {
        [s.position, s.velocity]
    }
}

/// Physical parameters of the oscillator. Constant for an entire run.
#[derive(Debug, Clone, Copy)]
pub struct Parameters {
    /// Oscillating mass, strictly positive
    pub mass: Mass,
    /// Spring stiffness (restoring term)
    pub stiffness: Stiffness,
    /// Viscous damping coefficient (dissipative term)
    pub damping: Damping,
    /// Constant external driving force
    pub force: Force,
}

impl Parameters {
    /// Create validated parameters.
    ///
    /// Rejects non-finite inputs, m <= 0, k < 0 and c < 0.
    pub fn new(
        mass: Mass,
        stiffness: Stiffness,
        damping: Damping,
        force: Force,
    ) -> ModelResult<Self> {
        ensure_positive(mass.value, "mass must be positive")?;
        ensure_finite(stiffness.value, "spring constant")?;
        ensure_finite(damping.value, "damping coefficient")?;
        ensure_finite(force.value, "external force")?;
        if stiffness.value < 0.0 {
            return Err(ModelError::NonPhysical {
                what: "spring constant must be non-negative",
            });
        }
        if damping.value < 0.0 {
            return Err(ModelError::NonPhysical {
                what: "damping coefficient must be non-negative",
            });
        }
        Ok(Self {
            mass,
            stiffness,
            damping,
            force,
        })
    }

    /// Create validated parameters from raw SI values (kg, N/m, N·s/m, N).
    pub fn from_si(mass: f64, stiffness: f64, damping: f64, force: f64) -> ModelResult<Self> {
        Self::new(kg(mass), n_per_m(stiffness), n_s_per_m(damping), n(force))
    }
}

/// Damped spring-mass oscillator driven by a constant external force.
///
/// Linear state-space form with x1 = position, x2 = velocity:
///
///   x1' = x2
///   x2' = (-k·x1 - c·x2 + u) / m
#[derive(Debug, Clone)]
pub struct SpringMassDamper {
    pub params: Parameters,
}

impl SpringMassDamper {
    pub fn new(params: Parameters) -> Self {
        Self { params }
    }

    /// Net acceleration at the given position and velocity.
    fn acceleration(&self, position: Length, velocity: Velocity) -> Accel {
        let p = &self.params;
        (p.force - p.stiffness * position - p.damping * velocity) / p.mass
    }

    /// Total mechanical energy ½·m·v² + ½·k·x².
    pub fn mechanical_energy(&self, state: &State) -> Energy {
        let p = &self.params;
        let kinetic = p.mass * mps(state.velocity) * mps(state.velocity) * 0.5;
        let potential = p.stiffness * m(state.position) * m(state.position) * 0.5;
        kinetic + potential
    }

    /// The (A, B) matrices of the linear form x_dot = A·x + B·u.
    ///
    /// Inspection only; the derivative itself is computed directly so that a
    /// nonlinear force term can be added later without touching callers.
    pub fn state_matrices(&self) -> (Matrix2<f64>, Vector2<f64>) {
        let m = self.params.mass.value;
        let k = self.params.stiffness.value;
        let c = self.params.damping.value;
        (
            Matrix2::new(0.0, 1.0, -k / m, -c / m),
            Vector2::new(0.0, 1.0 / m),
        )
    }
}

impl StateSpaceModel<2> for SpringMassDamper {
    fn derivative(&self, _t: f64, y: &[f64; 2]) -> ModelResult<[f64; 2]> {
        // Division guard for hand-assembled parameters
        if self.params.mass.value <= 0.0 {
            return Err(ModelError::NonPhysical {
                what: "mass must be positive",
            });
        }
        let accel = self.acceleration(m(y[0]), mps(y[1]));
        Ok([y[1], accel.value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::numeric::{Tolerances, nearly_equal};

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    #[test]
    fn parameters_reject_nonphysical_values() {
        assert!(Parameters::from_si(0.0, 10.0, 0.5, 0.0).is_err());
        assert!(Parameters::from_si(-1.0, 10.0, 0.5, 0.0).is_err());
        assert!(Parameters::from_si(1.0, -10.0, 0.5, 0.0).is_err());
        assert!(Parameters::from_si(1.0, 10.0, -0.5, 0.0).is_err());
        assert!(Parameters::from_si(1.0, 10.0, 0.5, f64::NAN).is_err());
        assert!(Parameters::from_si(1.0, 10.0, 0.5, 2.0).is_ok());
    }

    #[test]
    fn derivative_at_rest_is_zero() {
        let params = Parameters::from_si(1.0, 10.0, 0.5, 0.0).unwrap();
        let model = SpringMassDamper::new(params);
        let dy = model.derivative(0.0, &[0.0, 0.0]).unwrap();
        assert_eq!(dy, [0.0, 0.0]);
    }

    #[test]
    fn spring_restores_toward_origin() {
        let params = Parameters::from_si(1.0, 10.0, 0.0, 0.0).unwrap();
        let model = SpringMassDamper::new(params);
        let dy = model.derivative(0.0, &[1.0, 0.0]).unwrap();
        assert!(nearly_equal(dy[0], 0.0, tol()), "no velocity, no dx");
        assert!(nearly_equal(dy[1], -10.0, tol()), "a = -k·x/m");
    }

    #[test]
    fn constant_force_accelerates_free_mass() {
        let params = Parameters::from_si(2.0, 0.0, 0.0, 4.0).unwrap();
        let model = SpringMassDamper::new(params);
        let dy = model.derivative(0.0, &[0.0, 0.0]).unwrap();
        assert!(nearly_equal(dy[1], 2.0, tol()), "a = u/m");
    }

    #[test]
    fn derivative_matches_linear_form() {
        let params = Parameters::from_si(2.0, 8.0, 0.7, 3.0).unwrap();
        let model = SpringMassDamper::new(params);
        let (a_mat, b_vec) = model.state_matrices();

        let y = [0.3, -1.2];
        let dy = model.derivative(0.0, &y).unwrap();
        let expected = a_mat * Vector2::new(y[0], y[1]) + b_vec * params.force.value;

        assert!(nearly_equal(dy[0], expected[0], tol()));
        assert!(nearly_equal(dy[1], expected[1], tol()));
    }

    #[test]
    fn mechanical_energy_of_known_state() {
        let params = Parameters::from_si(2.0, 8.0, 0.0, 0.0).unwrap();
        let model = SpringMassDamper::new(params);
        // ½·2·2² + ½·8·1² = 4 + 4
        let e = model.mechanical_energy(&State::new(1.0, 2.0));
        assert!(nearly_equal(e.value, 8.0, tol()));
    }

    #[test]
    fn zero_mass_fails_at_evaluation() {
        // Bypasses Parameters::new on purpose
        let params = Parameters {
            mass: kg(0.0),
            stiffness: n_per_m(1.0),
            damping: n_s_per_m(0.0),
            force: n(0.0),
        };
        let model = SpringMassDamper::new(params);
        let err = model.derivative(0.0, &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ModelError::NonPhysical { .. }));
    }
}
