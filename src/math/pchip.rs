//! Shape-preserving piecewise cubic Hermite interpolation (PCHIP).
//!
//! Node derivatives follow Fritsch–Carlson / Fritsch–Butland:
//!
//! - interior node: weighted harmonic mean of the neighbouring secant slopes,
//!   or `0` when the secants change sign (local extremum) or either is flat
//! - end nodes: one-sided three-point estimate, limited so it keeps the sign
//!   of the end secant and never exceeds three times its magnitude when the
//!   data turns
//!
//! With these derivatives the interpolant is monotone on every interval where
//! the data is monotone, and does not overshoot the neighbouring node values.

/// A PCHIP interpolant through a fixed set of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Pchip {
    xs: Vec<f64>,
    ys: Vec<f64>,
    ds: Vec<f64>,
}

impl Pchip {
    /// Build the interpolant.
    ///
    /// Returns `None` unless there are at least two nodes, `xs` is strictly
    /// increasing, and every coordinate is finite.
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() < 2 || xs.len() != ys.len() {
            return None;
        }
        if !xs.iter().chain(ys.iter()).all(|v| v.is_finite()) {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let ds = node_derivatives(xs, ys);
        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            ds,
        })
    }

    /// Evaluate at `x`. Inputs outside the node range are clamped to it.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last = self.xs.len() - 1;
        let x = x.clamp(self.xs[0], self.xs[last]);

        // Interval k such that xs[k] <= x <= xs[k+1].
        let k = self.xs[1..last].partition_point(|&node| node < x);

        let h = self.xs[k + 1] - self.xs[k];
        let s = (x - self.xs[k]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * self.ys[k] + h10 * h * self.ds[k] + h01 * self.ys[k + 1] + h11 * h * self.ds[k + 1]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

fn node_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let m: Vec<f64> = (0..n - 1).map(|k| (ys[k + 1] - ys[k]) / h[k]).collect();

    if n == 2 {
        return vec![m[0], m[0]];
    }

    let mut d = vec![0.0; n];
    for k in 1..n - 1 {
        if m[k - 1] * m[k] <= 0.0 {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / m[k - 1] + w2 / m[k]);
    }

    d[0] = end_derivative(h[0], h[1], m[0], m[1]);
    d[n - 1] = end_derivative(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);
    d
}

fn end_derivative(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
