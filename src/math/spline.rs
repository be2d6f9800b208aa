//! Pluggable interpolation.
//!
//! The calculator only needs `fit(xs, ys) -> evaluable`, so the interpolant is
//! hidden behind two small traits. `InterpolationKind` picks an implementation.
//!
//! `NotAKnotCubic` is a C2 cubic spline whose end conditions force the third
//! derivative to be continuous at the second and second-to-last knots. This is
//! the same curve as a degree-3 interpolating B-spline with default knots.

use nalgebra::{DMatrix, DVector};

use crate::domain::InterpolationKind;
use crate::error::DistributionError;
use crate::math::pchip::Pchip;
use crate::math::solve::solve_linear_system;

/// Something that can build an interpolant through control points.
pub trait Interpolator {
    fn kind(&self) -> InterpolationKind;

    /// Minimum number of distinct control points `fit` accepts.
    fn min_points(&self) -> usize;

    /// Fit through `(xs[i], ys[i])`; `xs` must be strictly increasing.
    fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<Box<dyn Interpolant>, DistributionError>;
}

/// A fitted curve that can be evaluated anywhere on the real line.
pub trait Interpolant {
    fn eval(&self, x: f64) -> f64;
}

/// Resolve an interpolation kind to its implementation.
pub fn interpolator_for(kind: InterpolationKind) -> Box<dyn Interpolator> {
    match kind {
        InterpolationKind::Cubic => Box::new(NotAKnotCubic),
        InterpolationKind::Pchip => Box::new(Pchip),
    }
}

/// Shared checks for control points.
pub(crate) fn validate_knots(xs: &[f64], ys: &[f64], min_points: usize) -> Result<(), DistributionError> {
    if xs.len() != ys.len() {
        return Err(DistributionError::invalid(format!(
            "Control points mismatch: {} x values vs {} y values.",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < min_points {
        return Err(DistributionError::insufficient(format!(
            "Need at least {min_points} distinct points, got {}.",
            xs.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(DistributionError::invalid("Control points must be finite."));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(DistributionError::insufficient(
            "Control points must be strictly increasing in x.",
        ));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used to evaluate `x`.
///
/// Points outside the knots use the first/last segment (extrapolation).
pub(crate) fn segment_index(xs: &[f64], x: f64) -> usize {
    let n = xs.len();
    let upper = xs.partition_point(|&k| k <= x);
    upper.saturating_sub(1).min(n - 2)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NotAKnotCubic;

impl Interpolator for NotAKnotCubic {
    fn kind(&self) -> InterpolationKind {
        InterpolationKind::Cubic
    }

    fn min_points(&self) -> usize {
        4
    }

    fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<Box<dyn Interpolant>, DistributionError> {
        validate_knots(xs, ys, self.min_points())?;

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // Unknowns are the second derivatives M_0..M_{n-1} at the knots.
        let mut a = DMatrix::<f64>::zeros(n, n);
        let mut b = DVector::<f64>::zeros(n);

        // Not-a-knot at x_1: (M1 - M0)/h0 = (M2 - M1)/h1.
        a[(0, 0)] = h[1];
        a[(0, 1)] = -(h[0] + h[1]);
        a[(0, 2)] = h[0];

        for i in 1..n - 1 {
            a[(i, i - 1)] = h[i - 1];
            a[(i, i)] = 2.0 * (h[i - 1] + h[i]);
            a[(i, i + 1)] = h[i];
            b[i] = 6.0 * (slope[i] - slope[i - 1]);
        }

        // Not-a-knot at x_{n-2}.
        a[(n - 1, n - 3)] = h[n - 2];
        a[(n - 1, n - 2)] = -(h[n - 3] + h[n - 2]);
        a[(n - 1, n - 1)] = h[n - 3];

        let m = solve_linear_system(&a, &b).ok_or_else(|| {
            DistributionError::insufficient("Spline system is singular for these diameters.")
        })?;

        Ok(Box::new(CubicSpline {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m: m.iter().copied().collect(),
        }))
    }
}

/// Piecewise cubic in second-derivative form.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    m: Vec<f64>,
}

impl Interpolant for CubicSpline {
    fn eval(&self, x: f64) -> f64 {
        let i = segment_index(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;

        let a = x1 - x;
        let b = x - x0;
        m0 * a.powi(3) / (6.0 * h)
            + m1 * b.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * a
            + (y1 / h - m1 * h / 6.0) * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_passes_through_control_points() {
        let xs = [-1.2, -0.9, -0.3, 0.0, 0.4, 0.7];
        let ys = [2.0, 10.0, 35.0, 60.0, 92.0, 100.0];
        let spline = NotAKnotCubic.fit(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert!((spline.eval(*x) - y).abs() < 1e-9, "at x={x}");
        }
    }

    #[test]
    fn cubic_reproduces_a_cubic_polynomial() {
        let f = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x + 0.25 * x * x * x;
        let xs = [0.0, 0.5, 1.5, 2.0, 3.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = NotAKnotCubic.fit(&xs, &ys).unwrap();
        for &x in &[0.1, 0.75, 1.9, 2.6, 3.5, -0.5] {
            assert!((spline.eval(x) - f(x)).abs() < 1e-9, "at x={x}");
        }
    }

    #[test]
    fn cubic_with_four_points_is_the_interpolating_cubic() {
        let f = |x: f64| x * x * x - x;
        let xs = [0.0, 1.0, 2.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let spline = NotAKnotCubic.fit(&xs, &ys).unwrap();
        assert!((spline.eval(3.0) - f(3.0)).abs() < 1e-9);
    }

    #[test]
    fn cubic_rejects_three_points() {
        let err = NotAKnotCubic
            .fit(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0])
            .err()
            .unwrap();
        assert!(matches!(err, DistributionError::InsufficientData(_)));
    }

    #[test]
    fn rejects_unsorted_knots() {
        let err = NotAKnotCubic
            .fit(&[0.0, 2.0, 1.0, 3.0], &[1.0, 2.0, 3.0, 4.0])
            .err()
            .unwrap();
        assert!(matches!(err, DistributionError::InsufficientData(_)));
    }

    #[test]
    fn segment_index_clamps_outside_range() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(segment_index(&xs, -5.0), 0);
        assert_eq!(segment_index(&xs, 0.0), 0);
        assert_eq!(segment_index(&xs, 1.5), 1);
        assert_eq!(segment_index(&xs, 3.0), 2);
        assert_eq!(segment_index(&xs, 9.0), 2);
    }
}
