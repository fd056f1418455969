//! Integration driver: adaptive stepping plus dense-output resampling.

use sm_model::StateSpaceModel;
use tracing::{debug, trace, warn};

use crate::error::{SimError, SimResult};
use crate::grid::{SampleGrid, TimeSpan};
use crate::interpolate::StepSegment;
use crate::options::{Method, SolverOptions};
use crate::solution::{IntegrationStats, Solution};
use crate::stepper::{self, StepController};

/// Collects (time, state) pairs as the integration sweeps the sample grid.
///
/// Grid times are strictly increasing, so a single forward cursor suffices;
/// no step history is kept.
struct GridWriter<'a, const N: usize> {
    grid: &'a SampleGrid,
    cursor: usize,
    times: Vec<f64>,
    states: Vec<[f64; N]>,
}

impl<'a, const N: usize> GridWriter<'a, N> {
    fn new(grid: &'a SampleGrid) -> Self {
        Self {
            grid,
            cursor: 0,
            times: Vec::with_capacity(grid.len()),
            states: Vec::with_capacity(grid.len()),
        }
    }

    /// Emit every pending grid point at or before `t`.
    fn emit_through(&mut self, t: f64, mut value_at: impl FnMut(f64) -> [f64; N]) {
        while self.cursor < self.grid.len() && self.grid.times()[self.cursor] <= t {
            let ts = self.grid.times()[self.cursor];
            self.times.push(ts);
            self.states.push(value_at(ts));
            self.cursor += 1;
        }
    }

    fn exhausted(&self) -> bool {
        self.cursor == self.grid.len()
    }

    fn finish(self, stats: IntegrationStats) -> Solution<N> {
        Solution {
            times: self.times,
            states: self.states,
            stats,
        }
    }
}

/// Integrate `model` from `y0` across `span`, reporting at `grid` times.
///
/// Internal steps are chosen by the method's own error control; reported
/// values come from dense-output interpolation inside accepted steps, so the
/// grid never influences accuracy. The grid must lie within the span. A
/// degenerate span returns the initial state at the single admissible grid
/// point without any stepping.
///
/// The call is stateless: identical inputs produce identical output.
pub fn integrate<M, const N: usize>(
    model: &M,
    span: TimeSpan,
    y0: [f64; N],
    grid: &SampleGrid,
    opts: &SolverOptions,
) -> SimResult<Solution<N>>
where
    M: StateSpaceModel<N>,
{
    opts.validate()?;
    grid.check_within(span)?;

    debug!(
        "starting integration: t in [{}, {}], {} samples, {:?}, rtol {:.1e}, atol {:.1e}",
        span.start(),
        span.end(),
        grid.len(),
        opts.method,
        opts.rtol,
        opts.atol
    );

    if span.is_instant() {
        let states = vec![y0; grid.len()];
        return Ok(Solution {
            times: grid.times().to_vec(),
            states,
            stats: IntegrationStats::default(),
        });
    }

    let solution = match opts.method {
        Method::DormandPrince45 => adaptive_loop(model, span, y0, grid, opts),
        Method::Rk4 { step } => fixed_loop(model, span, y0, grid, opts, step),
    }?;

    debug!(
        "integration finished: {} accepted, {} rejected, {} evaluations",
        solution.stats.accepted_steps, solution.stats.rejected_steps, solution.stats.evaluations
    );
    Ok(solution)
}

fn adaptive_loop<M, const N: usize>(
    model: &M,
    span: TimeSpan,
    y0: [f64; N],
    grid: &SampleGrid,
    opts: &SolverOptions,
) -> SimResult<Solution<N>>
where
    M: StateSpaceModel<N>,
{
    let t_end = span.end();
    let max_step = opts.max_step.unwrap_or(span.length()).max(opts.min_step);
    let controller = StepController::default();

    let mut stats = IntegrationStats::default();
    let mut t = span.start();
    let mut y = y0;
    let mut f = model.derivative(t, &y)?;
    stats.evaluations += 1;

    let mut h = match opts.h0 {
        Some(h0) => h0,
        None => {
            stats.evaluations += 1;
            stepper::initial_step(model, t, &y, &f, opts.rtol, opts.atol)?
        }
    };
    h = h.clamp(opts.min_step, max_step);

    let mut writer = GridWriter::new(grid);
    writer.emit_through(t, |_| y0);

    while t < t_end {
        if stats.accepted_steps + stats.rejected_steps >= opts.max_steps {
            return Err(SimError::MaxStepsExceeded {
                t,
                max_steps: opts.max_steps,
                last_state: y.to_vec(),
            });
        }

        let h_attempt = h.min(t_end - t);
        let trial =
            stepper::dormand_prince_step(model, t, &y, &f, h_attempt, opts.rtol, opts.atol)?;
        stats.evaluations += 6;

        let (h_next, accept) = controller.next_step(h_attempt, trial.error_norm);

        if accept {
            // Land exactly on t_end once the remaining span is consumed
            let t_new = if h_attempt < t_end - t { t + h_attempt } else { t_end };
            let segment = StepSegment {
                t_old: t,
                t_new,
                y_old: y,
                y_new: trial.y_new,
                f_old: f,
                f_new: trial.f_new,
            };
            writer.emit_through(t_new, |ts| segment.eval(ts));

            trace!(
                "accepted step to t = {:.6e}, h = {:.3e}, err = {:.3e}",
                t_new, h_attempt, trial.error_norm
            );
            t = t_new;
            y = trial.y_new;
            // FSAL: the 7th stage opens the next step
            f = trial.f_new;
            stats.accepted_steps += 1;
        } else {
            trace!(
                "rejected step at t = {:.6e}, h = {:.3e}, err = {:.3e}",
                t, h_attempt, trial.error_norm
            );
            stats.rejected_steps += 1;
            if h_next < opts.min_step * 100.0 {
                warn!(
                    "step size approaching the floor at t = {:.6e}: h = {:.3e}, floor = {:.3e}",
                    t, h_next, opts.min_step
                );
            }
        }

        if h_next < opts.min_step && t < t_end {
            return Err(SimError::StepSizeUnderflow {
                t,
                h: h_next,
                last_state: y.to_vec(),
            });
        }
        h = h_next.min(max_step);
    }

    debug_assert!(writer.exhausted());
    Ok(writer.finish(stats))
}

fn fixed_loop<M, const N: usize>(
    model: &M,
    span: TimeSpan,
    y0: [f64; N],
    grid: &SampleGrid,
    opts: &SolverOptions,
    step: f64,
) -> SimResult<Solution<N>>
where
    M: StateSpaceModel<N>,
{
    let t_end = span.end();
    let mut stats = IntegrationStats::default();
    let mut t = span.start();
    let mut y = y0;
    let mut f = model.derivative(t, &y)?;
    stats.evaluations += 1;

    let mut writer = GridWriter::new(grid);
    writer.emit_through(t, |_| y0);

    while t < t_end {
        if stats.accepted_steps >= opts.max_steps {
            return Err(SimError::MaxStepsExceeded {
                t,
                max_steps: opts.max_steps,
                last_state: y.to_vec(),
            });
        }

        let h = step.min(t_end - t);
        let y_new = stepper::rk4_step(model, t, &y, &f, h)?;
        let t_new = if h < t_end - t { t + h } else { t_end };
        // Endpoint derivative: closes this step's interpolant, opens the next step
        let f_new = model.derivative(t_new, &y_new)?;
        stats.evaluations += 4;

        let segment = StepSegment {
            t_old: t,
            t_new,
            y_old: y,
            y_new,
            f_old: f,
            f_new,
        };
        writer.emit_through(t_new, |ts| segment.eval(ts));

        t = t_new;
        y = y_new;
        f = f_new;
        stats.accepted_steps += 1;
    }

    debug_assert!(writer.exhausted());
    Ok(writer.finish(stats))
}
