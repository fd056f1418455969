//! Parameter sweeps: many independent runs in parallel.

use rayon::prelude::*;

use crate::error::SimResult;
use crate::simulate::{SimulationConfig, run_simulation};
use crate::trajectory::Trajectory;

/// Run every configuration and collect one result per entry.
///
/// Runs share nothing and execute in parallel. Results come back in input
/// order, each carrying its own success or failure, so one bad configuration
/// does not poison the rest of the sweep.
pub fn run_sweep(configs: &[SimulationConfig]) -> Vec<SimResult<Trajectory>> {
    configs.par_iter().map(run_simulation).collect()
}
