//! Cubic Hermite interpolation across one accepted step.

/// One completed step with endpoint derivatives, ready for dense output.
///
/// Interpolation runs in theta = (t - t_old)/h:
///
///   y(theta) = y_old + theta·h·f_old + theta²·a + theta³·b
///   a = 3·dy - h·(2·f_old + f_new)
///   b = -2·dy + h·(f_old + f_new)
///
/// Exact at both endpoints and for solutions up to cubic in t, which keeps
/// the interpolation error below the accepted-step error at the tolerances
/// this solver runs at.
#[derive(Debug, Clone)]
pub(crate) struct StepSegment<const N: usize> {
    pub t_old: f64,
    pub t_new: f64,
    pub y_old: [f64; N],
    pub y_new: [f64; N],
    pub f_old: [f64; N],
    pub f_new: [f64; N],
}

impl<const N: usize> StepSegment<N> {
    pub fn h(&self) -> f64 {
        self.t_new - self.t_old
    }

    /// Evaluate the interpolant at a time inside [t_old, t_new].
    pub fn eval(&self, t: f64) -> [f64; N] {
        let h = self.h();
        let theta = if h == 0.0 { 0.0 } else { (t - self.t_old) / h };
        let mut y = [0.0; N];
        for i in 0..N {
            let dy = self.y_new[i] - self.y_old[i];
            let a = 3.0 * dy - h * (2.0 * self.f_old[i] + self.f_new[i]);
            let b = -2.0 * dy + h * (self.f_old[i] + self.f_new[i]);
            y[i] = self.y_old[i]
                + theta * h * self.f_old[i]
                + theta * theta * a
                + theta * theta * theta * b;
        }
        y
    }
}
