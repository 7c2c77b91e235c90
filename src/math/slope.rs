//! Slope classification used for collinear-point removal.
//!
//! Vertical and horizontal segments are classified into signed zeroes and
//! signed infinities instead of dividing by zero, so runs along either axis
//! compare equal without producing NaN.

/// Classified slope of a 2D segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slope {
    /// Ordinary finite ratio `dy / dx`.
    Value(f64),
    /// Horizontal segment travelling in +X.
    PosZero,
    /// Horizontal segment travelling in -X.
    NegZero,
    /// Vertical segment travelling in +Y.
    PosInfinity,
    /// Vertical segment travelling in -Y.
    NegInfinity,
}

/// Tolerance for treating a coordinate delta as zero.
const AXIS_TOL: f64 = 1e-12;

/// Tolerance for comparing finite slope ratios.
const RATIO_TOL: f64 = 1e-8;

impl Slope {
    /// Classifies the slope of the segment from `(x1, y1)` to `(x2, y2)`.
    ///
    /// A zero-length segment classifies as `PosZero`; callers are expected to
    /// have removed duplicate vertices beforehand.
    #[must_use]
    pub fn classify(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let dx = x2 - x1;
        let dy = y2 - y1;
        if dx.abs() < AXIS_TOL {
            if dy > AXIS_TOL {
                Slope::PosInfinity
            } else if dy < -AXIS_TOL {
                Slope::NegInfinity
            } else {
                Slope::PosZero
            }
        } else if dy.abs() < AXIS_TOL {
            if dx > 0.0 {
                Slope::PosZero
            } else {
                Slope::NegZero
            }
        } else {
            Slope::Value(dy / dx)
        }
    }

    /// Approximate equality under the classification scheme.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        match (self, other) {
            (Slope::Value(a), Slope::Value(b)) => {
                let scale = a.abs().max(b.abs()).max(1.0);
                (a - b).abs() <= RATIO_TOL * scale
            }
            (Slope::PosZero, Slope::PosZero)
            | (Slope::NegZero, Slope::NegZero)
            | (Slope::PosInfinity, Slope::PosInfinity)
            | (Slope::NegInfinity, Slope::NegInfinity) => true,
            _ => false,
        }
    }
}
