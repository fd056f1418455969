//! Simulation output: the oscillator state sampled at requested times.

use serde::{Deserialize, Serialize};
use sm_model::State;

use crate::solution::{IntegrationStats, Solution};

/// Time-ordered record of oscillator states at the requested sample times.
///
/// Times are strictly increasing and aligned one-to-one with states. Built
/// by [`run_simulation`](crate::simulate::run_simulation); not constructible
/// from unchecked parts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
    stats: IntegrationStats,
}

impl Trajectory {
    pub(crate) fn from_solution(solution: Solution<2>) -> Self {
        let states = solution.states.iter().map(|&y| State::from(y)).collect();
        Self {
            times: solution.times,
            states,
            stats: solution.stats,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sample times in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sampled states, aligned with [`times`](Self::times).
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Work counters from the underlying integration.
    pub fn stats(&self) -> IntegrationStats {
        self.stats
    }

    /// Iterate over `(time, state)` pairs in sample order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &State)> {
        self.times.iter().copied().zip(self.states.iter())
    }

    /// The last sampled point, if any.
    pub fn final_point(&self) -> Option<(f64, State)> {
        let t = *self.times.last()?;
        let s = *self.states.last()?;
        Some((t, s))
    }
}
