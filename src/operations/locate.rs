use crate::error::{MeasureError, Result};
use crate::geometry::{Geometry, LrsPoint};
use crate::operations::{measure_eq, require_line_family, require_monotonic};

/// The result of locating a measure along a line: the point itself plus
/// whether it coincides with an existing vertex of the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocatedPoint {
    pub point: LrsPoint,
    pub is_shape_point: bool,
}

impl LocatedPoint {
    /// Wraps the located point as a geometry.
    #[must_use]
    pub fn into_geometry(self) -> Geometry {
        Geometry::Point(self.point)
    }
}

/// Finds the point at a given measure along a measured line geometry.
///
/// Sub-lines are scanned in order and the first segment whose measure
/// interval contains the target wins. A located point landing within
/// `tolerance` of a vertex snaps to that vertex and is reported as a shape
/// point.
#[derive(Debug)]
pub struct LocateAlongMeasure {
    measure: f64,
    tolerance: f64,
}

impl LocateAlongMeasure {
    /// Creates a new locate operation.
    #[must_use]
    pub fn new(measure: f64, tolerance: f64) -> Self {
        Self { measure, tolerance }
    }

    /// Executes the locate.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `NotMonotonic` when a sub-line's measures reverse direction
    /// - `OutOfRange` when no segment covers the target measure; the error
    ///   carries the geometry's full measure extent
    pub fn execute(&self, geometry: &Geometry) -> Result<LocatedPoint> {
        require_line_family(geometry)?;
        require_monotonic(geometry)?;

        let mut extent: Option<(f64, f64)> = None;
        for line in geometry.as_lines() {
            if let Some((lo, hi)) = line.measure_range() {
                extent = Some(match extent {
                    Some((a, b)) => (a.min(lo), b.max(hi)),
                    None => (lo, hi),
                });
            }
            if let Some(located) = self.locate_on_line(line.points()) {
                return Ok(located);
            }
        }

        let (min, max) = extent.unwrap_or((0.0, 0.0));
        Err(MeasureError::OutOfRange {
            measure: self.measure,
            min,
            max,
        }
        .into())
    }

    fn locate_on_line(&self, points: &[LrsPoint]) -> Option<LocatedPoint> {
        if let [only] = points {
            if measure_eq(only.measure_or_zero(), self.measure) {
                return Some(LocatedPoint {
                    point: *only,
                    is_shape_point: true,
                });
            }
            return None;
        }
        for pair in points.windows(2) {
            let (p, q) = (&pair[0], &pair[1]);
            let (mp, mq) = (p.measure_or_zero(), q.measure_or_zero());
            let lo = mp.min(mq);
            let hi = mp.max(mq);
            let covered = (lo..=hi).contains(&self.measure)
                || measure_eq(self.measure, lo)
                || measure_eq(self.measure, hi);
            if !covered {
                continue;
            }
            let candidate = LrsPoint::interpolate_at_measure(p, q, self.measure);
            for vertex in [p, q] {
                if candidate.is_within(vertex, self.tolerance) {
                    return Some(LocatedPoint {
                        point: *vertex,
                        is_shape_point: true,
                    });
                }
            }
            return Some(LocatedPoint {
                point: candidate,
                is_shape_point: false,
            });
        }
        None
    }
}
