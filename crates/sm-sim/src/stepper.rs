//! Embedded Runge-Kutta steppers.
//!
//! Dormand-Prince 5(4) with the FSAL property for adaptive integration and
//! classic RK4 for fixed-step integration. Both advance raw state arrays;
//! the model trait supplies the derivative.

use sm_model::StateSpaceModel;

use crate::error::SimResult;

// Dormand-Prince node coefficients
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

// Dormand-Prince stage coefficients
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order solution weights (b2 = 0)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Error weights, 5th minus embedded 4th order (e2 = 0)
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// y + h * sum(coeffs[j] * stages[j])
fn combine<const N: usize>(y: &[f64; N], h: f64, stages: &[&[f64; N]], coeffs: &[f64]) -> [f64; N] {
    debug_assert_eq!(stages.len(), coeffs.len());
    let mut out = *y;
    for (stage, &c) in stages.iter().zip(coeffs) {
        for i in 0..N {
            out[i] += h * c * stage[i];
        }
    }
    out
}

/// Outcome of one trial Dormand-Prince step.
pub(crate) struct TrialStep<const N: usize> {
    /// 5th-order solution at t + h
    pub y_new: [f64; N],
    /// Derivative at (t + h, y_new); becomes the next step's first stage
    pub f_new: [f64; N],
    /// Error norm scaled so that values <= 1 are acceptable
    pub error_norm: f64,
}

/// One trial Dormand-Prince 5(4) step from (t, y) with step size h.
///
/// `f_start` must equal the derivative at (t, y); under FSAL the caller
/// already has it from the previous accepted step. Costs 6 derivative
/// evaluations.
pub(crate) fn dormand_prince_step<M, const N: usize>(
    model: &M,
    t: f64,
    y: &[f64; N],
    f_start: &[f64; N],
    h: f64,
    rtol: f64,
    atol: f64,
) -> SimResult<TrialStep<N>>
where
    M: StateSpaceModel<N>,
{
    let k1 = *f_start;
    let k2 = model.derivative(t + C2 * h, &combine(y, h, &[&k1], &[A21]))?;
    let k3 = model.derivative(t + C3 * h, &combine(y, h, &[&k1, &k2], &[A31, A32]))?;
    let k4 = model.derivative(t + C4 * h, &combine(y, h, &[&k1, &k2, &k3], &[A41, A42, A43]))?;
    let k5 = model.derivative(
        t + C5 * h,
        &combine(y, h, &[&k1, &k2, &k3, &k4], &[A51, A52, A53, A54]),
    )?;
    let k6 = model.derivative(
        t + h,
        &combine(y, h, &[&k1, &k2, &k3, &k4, &k5], &[A61, A62, A63, A64, A65]),
    )?;

    let y_new = combine(y, h, &[&k1, &k3, &k4, &k5, &k6], &[B1, B3, B4, B5, B6]);

    // FSAL stage; doubles as the error estimate's 7th term
    let f_new = model.derivative(t + h, &y_new)?;

    let mut err_sum = 0.0;
    for i in 0..N {
        let e = h
            * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * f_new[i]);
        let sc = atol + rtol * y[i].abs().max(y_new[i].abs());
        err_sum += (e / sc).powi(2);
    }
    let error_norm = (err_sum / N as f64).sqrt();

    Ok(TrialStep {
        y_new,
        f_new,
        error_norm,
    })
}

/// One classic RK4 step from (t, y) with step size h.
///
/// `f_start` must equal the derivative at (t, y). Costs 3 derivative
/// evaluations; no error estimate.
pub(crate) fn rk4_step<M, const N: usize>(
    model: &M,
    t: f64,
    y: &[f64; N],
    f_start: &[f64; N],
    h: f64,
) -> SimResult<[f64; N]>
where
    M: StateSpaceModel<N>,
{
    let k1 = *f_start;
    let k2 = model.derivative(t + 0.5 * h, &combine(y, h, &[&k1], &[0.5]))?;
    let k3 = model.derivative(t + 0.5 * h, &combine(y, h, &[&k2], &[0.5]))?;
    let k4 = model.derivative(t + h, &combine(y, h, &[&k3], &[1.0]))?;

    let mut y_new = *y;
    for i in 0..N {
        y_new[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    Ok(y_new)
}

/// Step-size controller for the embedded pair.
///
/// The update is h · safety · error^(-1/5), clamped to
/// [min_factor, max_factor]; the exponent matches the embedded 4th-order
/// estimate. A rejected step never grows.
pub(crate) struct StepController {
    pub safety: f64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 10.0,
        }
    }
}

impl StepController {
    /// New step size and acceptance for a trial with the given error norm.
    pub fn next_step(&self, h: f64, error_norm: f64) -> (f64, bool) {
        let accept = error_norm <= 1.0;
        let factor = if error_norm == 0.0 {
            self.max_factor
        } else {
            self.safety * (1.0 / error_norm).powf(0.2)
        };
        let mut factor = factor.clamp(self.min_factor, self.max_factor);
        if !accept {
            factor = factor.min(1.0);
        }
        (h * factor, accept)
    }
}

/// First-step heuristic: start from the derivative magnitude at t0, refine
/// with one explicit Euler trial. Costs 1 derivative evaluation.
pub(crate) fn initial_step<M, const N: usize>(
    model: &M,
    t0: f64,
    y0: &[f64; N],
    f0: &[f64; N],
    rtol: f64,
    atol: f64,
) -> SimResult<f64>
where
    M: StateSpaceModel<N>,
{
    let n_sqrt = (N as f64).sqrt();
    let mut sc = [0.0; N];
    for i in 0..N {
        sc[i] = atol + rtol * y0[i].abs();
    }

    let d0 = y0
        .iter()
        .zip(&sc)
        .map(|(y, s)| (y / s).powi(2))
        .sum::<f64>()
        .sqrt()
        / n_sqrt;
    let d1 = f0
        .iter()
        .zip(&sc)
        .map(|(f, s)| (f / s).powi(2))
        .sum::<f64>()
        .sqrt()
        / n_sqrt;

    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1 = combine(y0, h0, &[f0], &[1.0]);
    let f1 = model.derivative(t0 + h0, &y1)?;

    let d2 = f1
        .iter()
        .zip(f0)
        .zip(&sc)
        .map(|((a, b), s)| ((a - b) / s).powi(2))
        .sum::<f64>()
        .sqrt()
        / (h0 * n_sqrt);

    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(0.2)
    };

    Ok((100.0 * h0).min(h1))
}
