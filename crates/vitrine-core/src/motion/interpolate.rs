//! L4 Atomic Layer: Piecewise-linear interpolation through breakpoints
//!
//! An [`Interpolator`] maps an input (usually an animated value's current
//! value) through strictly increasing breakpoints onto numeric or color
//! outputs. Breakpoints are validated once at construction, so evaluation is
//! infallible.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::timing::lerp;
use crate::{Error, Result};

/// Behaviour outside the breakpoint range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Hold the boundary output
    #[default]
    Clamp,
    /// Continue the slope of the outermost segment
    Extend,
}

/// Output types an interpolator can produce
pub trait Interpolate: Clone {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        lerp(*from, *to, t)
    }
}

impl Interpolate for Color {
    #[inline]
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.lerp(*to, t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator<T> {
    input: Vec<f64>,
    output: Vec<T>,
    extrapolation: Extrapolation,
}

impl<T: Interpolate> Interpolator<T> {
    /// Build an interpolator with `Clamp` extrapolation
    pub fn new(input: impl Into<Vec<f64>>, output: impl Into<Vec<T>>) -> Result<Self> {
        Self::with_extrapolation(input, output, Extrapolation::Clamp)
    }

    /// Build an interpolator, failing on malformed breakpoints
    pub fn with_extrapolation(
        input: impl Into<Vec<f64>>,
        output: impl Into<Vec<T>>,
        extrapolation: Extrapolation,
    ) -> Result<Self> {
        let input = input.into();
        let output = output.into();

        if input.len() != output.len() {
            return Err(Error::BreakpointMismatch {
                inputs: input.len(),
                outputs: output.len(),
            });
        }
        if input.len() < 2 {
            return Err(Error::TooFewBreakpoints(input.len()));
        }
        if let Some(index) = input.iter().position(|v| !v.is_finite()) {
            return Err(Error::BreakpointsNotIncreasing { index });
        }
        if let Some(index) = input.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::BreakpointsNotIncreasing { index: index + 1 });
        }

        Ok(Self {
            input,
            output,
            extrapolation,
        })
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.input
    }

    pub fn outputs(&self) -> &[T] {
        &self.output
    }

    /// Map `value` through the breakpoints
    ///
    /// NaN inputs are treated as the lower bound.
    pub fn evaluate(&self, value: f64) -> T {
        let last = self.input.len() - 1;
        let value = if value.is_nan() { self.input[0] } else { value };

        if value <= self.input[0] && self.extrapolation == Extrapolation::Clamp {
            return self.output[0].clone();
        }
        if value >= self.input[last] && self.extrapolation == Extrapolation::Clamp {
            return self.output[last].clone();
        }

        // Segment whose left edge is the last breakpoint <= value, kept within
        // [0, last - 1] so Extend reuses the outermost segments
        let segment = self
            .input
            .partition_point(|&b| b <= value)
            .saturating_sub(1)
            .min(last - 1);

        let (x0, x1) = (self.input[segment], self.input[segment + 1]);
        let t = (value - x0) / (x1 - x0);
        T::interpolate(&self.output[segment], &self.output[segment + 1], t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_and_midpoint() {
        let interp = Interpolator::new([0.0, 1.0], [10.0, 30.0]).unwrap();
        assert_eq!(interp.evaluate(0.0), 10.0);
        assert_eq!(interp.evaluate(1.0), 30.0);
        assert_eq!(interp.evaluate(0.5), 20.0);
    }

    #[test]
    fn test_color_midpoint_is_channel_wise() {
        let a = Color::rgba(0, 0, 0, 0);
        let b = Color::rgba(200, 100, 50, 254);
        let interp = Interpolator::new([0.0, 1.0], [a, b]).unwrap();
        assert_eq!(interp.evaluate(0.0), a);
        assert_eq!(interp.evaluate(1.0), b);
        assert_eq!(interp.evaluate(0.5), Color::rgba(100, 50, 25, 127));
    }

    #[test]
    fn test_clamp_outside_range() {
        let interp = Interpolator::new([-1.0, 0.0, 2.0], [5.0, 1.0, 9.0]).unwrap();
        for x in [-1000.0, -1.5, -1.0000001, f64::NEG_INFINITY] {
            assert_eq!(interp.evaluate(x), 5.0, "x={}", x);
        }
        for x in [2.0000001, 3.0, 1e9, f64::INFINITY] {
            assert_eq!(interp.evaluate(x), 9.0, "x={}", x);
        }
    }

    #[test]
    fn test_extend_continues_slope() {
        let interp = Interpolator::with_extrapolation(
            [0.0, 1.0, 2.0],
            [0.0, 10.0, 30.0],
            Extrapolation::Extend,
        )
        .unwrap();
        assert!((interp.evaluate(-1.0) - -10.0).abs() < 1e-9);
        assert!((interp.evaluate(3.0) - 50.0).abs() < 1e-9);
        assert!((interp.evaluate(1.5) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_multi_segment() {
        let interp = Interpolator::new([0.0, 10.0, 20.0], [0.0, 1.0, 0.0]).unwrap();
        assert!((interp.evaluate(5.0) - 0.5).abs() < 1e-9);
        assert!((interp.evaluate(10.0) - 1.0).abs() < 1e-9);
        assert!((interp.evaluate(15.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_increasing() {
        let err = Interpolator::new([0.0, 1.0, 1.0], [0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::BreakpointsNotIncreasing { index: 2 }));

        let err = Interpolator::new([1.0, 0.0], [0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::BreakpointsNotIncreasing { index: 1 }));

        let err = Interpolator::new([0.0, f64::NAN], [0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::BreakpointsNotIncreasing { index: 1 }));
    }

    #[test]
    fn test_rejects_mismatched_lengths() {
        let err = Interpolator::new([0.0, 1.0, 2.0], [0.0, 1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::BreakpointMismatch {
                inputs: 3,
                outputs: 2
            }
        ));
        let err = Interpolator::<f64>::new([0.0], [1.0]).unwrap_err();
        assert!(matches!(err, Error::TooFewBreakpoints(1)));
    }

    #[test]
    fn test_nan_input_maps_to_lower_bound() {
        let interp = Interpolator::new([0.0, 1.0], [3.0, 4.0]).unwrap();
        assert_eq!(interp.evaluate(f64::NAN), 3.0);
    }
}
