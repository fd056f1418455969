//! Front door: configure and run a spring-mass simulation end to end.

use serde::{Deserialize, Serialize};
use sm_model::{Parameters, SpringMassDamper};
use tracing::info;

use crate::error::{SimError, SimResult};
use crate::grid::{SampleGrid, TimeSpan};
use crate::integrate::integrate;
use crate::options::SolverOptions;
use crate::trajectory::Trajectory;

/// Sample count used when the caller does not ask for a specific resolution.
pub const DEFAULT_SAMPLES: usize = 1000;

/// Complete description of one simulation run.
///
/// Physical parameters are plain SI scalars here; they are promoted to typed
/// quantities (and validated) when the run starts. `simulation_time` is the
/// duration in seconds, always starting from t = 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Oscillator mass in kg, must be positive
    pub mass: f64,
    /// Spring constant in N/m, must be non-negative
    pub spring_constant: f64,
    /// Damping coefficient in N·s/m, must be non-negative
    pub damping: f64,
    /// Constant external force in N
    pub force: f64,
    /// Initial displacement in m
    pub initial_position: f64,
    /// Initial velocity in m/s
    pub initial_velocity: f64,
    /// Duration in s, must be positive
    pub simulation_time: f64,
    /// Number of evenly spaced output samples, endpoints included
    pub samples: usize,
    pub solver: SolverOptions,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            spring_constant: 10.0,
            damping: 0.5,
            force: 0.0,
            initial_position: 1.0,
            initial_velocity: 0.0,
            simulation_time: 10.0,
            samples: DEFAULT_SAMPLES,
            solver: SolverOptions::default(),
        }
    }
}

/// Run one simulation described by `config`.
///
/// Validates the configuration, integrates the oscillator over
/// `[0, simulation_time]` and resamples the result onto a uniform grid of
/// `samples` points. All validation happens before the first derivative
/// evaluation, so an `Err` here never reflects partial work.
pub fn run_simulation(config: &SimulationConfig) -> SimResult<Trajectory> {
    if !config.simulation_time.is_finite() || config.simulation_time <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "simulation_time must be positive and finite",
        });
    }
    if !config.initial_position.is_finite() || !config.initial_velocity.is_finite() {
        return Err(SimError::InvalidArg {
            what: "initial state must be finite",
        });
    }

    let params = Parameters::from_si(
        config.mass,
        config.spring_constant,
        config.damping,
        config.force,
    )?;
    let model = SpringMassDamper::new(params);

    let span = TimeSpan::new(0.0, config.simulation_time)?;
    let grid = SampleGrid::uniform(span, config.samples)?;

    info!(
        "running spring-mass simulation: m = {} kg, k = {} N/m, c = {} N·s/m, u = {} N, {} s, {} samples",
        config.mass,
        config.spring_constant,
        config.damping,
        config.force,
        config.simulation_time,
        config.samples
    );

    let y0 = [config.initial_position, config.initial_velocity];
    let solution = integrate(&model, span, y0, &grid, &config.solver)?;
    Ok(Trajectory::from_solution(solution))
}
