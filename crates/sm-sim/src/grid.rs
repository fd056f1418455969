//! Time span and sample grid for trajectory reporting.

use crate::error::{SimError, SimResult};

/// Closed integration interval [start, end] with start <= end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpan {
    start: f64,
    end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> SimResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SimError::InvalidArg {
                what: "time span bounds must be finite",
            });
        }
        if end < start {
            return Err(SimError::InvalidArg {
                what: "time span end must not precede its start",
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Span length in seconds.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    /// True for a degenerate span (start == end).
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// True if t lies within the closed interval.
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Strictly increasing times at which the caller wants reported output.
///
/// The grid controls reporting resolution only; the integrator picks its own
/// internal steps and interpolates onto these times.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    times: Vec<f64>,
}

impl SampleGrid {
    /// Uniform grid of `count` points across the span, endpoints included.
    ///
    /// A degenerate span collapses to the single point at its start
    /// regardless of `count`.
    pub fn uniform(span: TimeSpan, count: usize) -> SimResult<Self> {
        if count == 0 {
            return Err(SimError::InvalidArg {
                what: "sample count must be at least 1",
            });
        }
        if span.is_instant() || count == 1 {
            return Ok(Self {
                times: vec![span.start()],
            });
        }
        let h = span.length() / (count - 1) as f64;
        let mut times: Vec<f64> = (0..count).map(|i| span.start() + h * i as f64).collect();
        // Pin the endpoint: accumulated rounding must not push it past the span
        times[count - 1] = span.end();
        Ok(Self { times })
    }

    /// Grid from explicit times; must be finite and strictly increasing.
    pub fn from_times(times: Vec<f64>) -> SimResult<Self> {
        if times.is_empty() {
            return Err(SimError::InvalidArg {
                what: "sample grid must not be empty",
            });
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "sample times must be finite",
            });
        }
        if times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidArg {
                what: "sample times must be strictly increasing",
            });
        }
        Ok(Self { times })
    }

    /// Verify every sample lies inside the span, reporting the first outlier.
    pub fn check_within(&self, span: TimeSpan) -> SimResult<()> {
        for &t in &self.times {
            if !span.contains(t) {
                return Err(SimError::SampleOutOfSpan {
                    t,
                    t_start: span.start(),
                    t_end: span.end(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_rejects_reversed_and_nonfinite_bounds() {
        assert!(TimeSpan::new(1.0, 0.0).is_err());
        assert!(TimeSpan::new(f64::NAN, 1.0).is_err());
        assert!(TimeSpan::new(0.0, f64::INFINITY).is_err());
        assert!(TimeSpan::new(2.0, 2.0).unwrap().is_instant());
    }

    #[test]
    fn uniform_grid_hits_endpoints_exactly() {
        let span = TimeSpan::new(0.0, 10.0).unwrap();
        let grid = SampleGrid::uniform(span, 1000).unwrap();
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid.times()[0], 0.0);
        assert_eq!(grid.times()[999], 10.0);
    }

    #[test]
    fn uniform_grid_on_degenerate_span_is_single_point() {
        let span = TimeSpan::new(3.0, 3.0).unwrap();
        let grid = SampleGrid::uniform(span, 1000).unwrap();
        assert_eq!(grid.times(), &[3.0]);
    }

    #[test]
    fn from_times_rejects_bad_sequences() {
        assert!(SampleGrid::from_times(vec![]).is_err());
        assert!(SampleGrid::from_times(vec![0.0, 0.0, 1.0]).is_err());
        assert!(SampleGrid::from_times(vec![0.0, 2.0, 1.0]).is_err());
        assert!(SampleGrid::from_times(vec![0.0, f64::NAN]).is_err());
        assert!(SampleGrid::from_times(vec![0.0, 0.5, 2.0]).is_ok());
    }

    #[test]
    fn check_within_reports_the_outlier() {
        let span = TimeSpan::new(0.0, 10.0).unwrap();
        let grid = SampleGrid::from_times(vec![0.0, 5.0, 12.0]).unwrap();
        let err = grid.check_within(span).unwrap_err();
        match err {
            SimError::SampleOutOfSpan { t, t_start, t_end } => {
                assert_eq!(t, 12.0);
                assert_eq!(t_start, 0.0);
                assert_eq!(t_end, 10.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
