//! L4 Atomic Layer: Pure easing curves for timing drivers
//!
//! Every curve maps progress in [0, 1] to eased progress in [0, 1] and hits
//! both endpoints exactly.

use serde::{Deserialize, Serialize};

/// Easing curve applied by a timing driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingCurve {
    /// Hold the start value, then jump at the end
    None,
    Linear,
    /// Cubic ease-out: f(t) = 1 - (1-t)³
    #[default]
    Cubic,
    /// Quintic ease-out: f(t) = 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: f(t) = 1 - 2^(-10t)
    EaseOut,
    /// Cubic ease-in-out
    EaseInOut,
    /// CSS-style cubic-bezier with control points (x1, y1, x2, y2)
    Bezier([f64; 4]),
}

impl EasingCurve {
    /// Apply the curve to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased progress
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            EasingCurve::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingCurve::Linear => t,
            EasingCurve::Cubic => cubic_ease_out(t),
            EasingCurve::Quintic => quintic_ease_out(t),
            EasingCurve::EaseOut => exponential_ease_out(t),
            EasingCurve::EaseInOut => cubic_ease_in_out(t),
            EasingCurve::Bezier([x1, y1, x2, y2]) => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Check that a bezier curve is well formed (x control points in [0, 1])
    pub fn is_valid(&self) -> bool {
        match self {
            EasingCurve::Bezier([x1, y1, x2, y2]) => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(x1)
                    && (0.0..=1.0).contains(x2)
            }
            _ => true,
        }
    }
}

#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// One coordinate of a cubic bezier with endpoints fixed at 0 and 1
#[inline]
fn bezier_coord(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Solve x(s) = t for s, then return y(s)
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Newton-Raphson converges in a handful of steps for sane curves
    let mut s = t;
    for _ in 0..8 {
        let x = bezier_coord(x1, x2, s) - t;
        if x.abs() < 1e-7 {
            return bezier_coord(y1, y2, s);
        }
        let dx = bezier_slope(x1, x2, s);
        if dx.abs() < 1e-6 {
            break;
        }
        s -= x / dx;
    }

    // Bisection fallback for flat regions
    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..32 {
        let x = bezier_coord(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_coord(y1, y2, s)
}
