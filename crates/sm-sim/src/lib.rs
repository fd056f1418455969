//! Trajectory integration for springsim state-space models.
//!
//! Provides:
//! - Adaptive Dormand-Prince 5(4) stepping with local error control
//! - Fixed-step RK4 alternative
//! - Dense-output resampling onto a caller-supplied sample grid
//! - Typed trajectory results with solver statistics
//! - Simulation front door (config in, trajectory out) and parallel sweeps

pub mod error;
pub mod grid;
pub mod integrate;
pub mod options;
pub mod simulate;
pub mod solution;
pub mod stepper;
pub mod sweep;
pub mod trajectory;

// Internal modules
mod interpolate;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use grid::{SampleGrid, TimeSpan};
pub use integrate::integrate;
pub use options::{Method, SolverOptions};
pub use simulate::{DEFAULT_SAMPLES, SimulationConfig, run_simulation};
pub use solution::{IntegrationStats, Solution};
pub use sweep::run_sweep;
pub use trajectory::Trajectory;
