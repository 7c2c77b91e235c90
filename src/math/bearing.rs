//! Azimuth bearings for the parallel-curve engine.
//!
//! Bearings are measured in degrees clockwise from north (positive Y), in
//! `[0, 360)`. A point translated along bearing `b` by distance `d` moves by
//! `(d * sin(b), d * cos(b))`.

use crate::math::{Vector2, TOLERANCE};

/// Computes the azimuth bearing from `(x1, y1)` toward `(x2, y2)` in degrees.
///
/// Returns `None` when the two points coincide within tolerance.
#[must_use]
pub fn azimuth(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<f64> {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx.hypot(dy) < TOLERANCE {
        return None;
    }
    let atan2_deg = dy.atan2(dx).to_degrees();
    Some((90.0 - atan2_deg).rem_euclid(360.0))
}

/// Normalizes an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Bisects two bearings, flipping by 180° when they wrap across north so the
/// result stays between the incoming and outgoing directions.
#[must_use]
pub fn bisect_bearings(first: f64, second: f64) -> f64 {
    let mid = (first + second) / 2.0;
    if (first - second).abs() > 180.0 {
        normalize_angle(mid + 180.0)
    } else {
        normalize_angle(mid)
    }
}

/// Unit direction vector along a bearing in degrees.
#[must_use]
pub fn bearing_direction(bearing: f64) -> Vector2 {
    let rad = bearing.to_radians();
    Vector2::new(rad.sin(), rad.cos())
}

/// Translates `(x, y)` along `bearing` (degrees) by `distance`.
#[must_use]
pub fn translate_along(x: f64, y: f64, bearing: f64, distance: f64) -> (f64, f64) {
    let dir = bearing_direction(bearing);
    (x + dir.x * distance, y + dir.y * distance)
}
