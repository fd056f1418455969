//! Raw integration output and run statistics.

use serde::{Deserialize, Serialize};

/// Counters from one integration run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStats {
    /// Model derivative evaluations
    pub evaluations: usize,
    /// Accepted internal steps
    pub accepted_steps: usize,
    /// Rejected internal steps
    pub rejected_steps: usize,
}

/// Integration output sampled on the caller's grid.
///
/// `times[i]` pairs with `states[i]`; the lengths always match and the times
/// reproduce the requested grid in count and order.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<const N: usize> {
    pub times: Vec<f64>,
    pub states: Vec<[f64; N]>,
    pub stats: IntegrationStats,
}

impl<const N: usize> Solution<N> {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
