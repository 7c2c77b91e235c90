use crate::error::{GeometryError, Result};
use crate::geometry::{Geometry, LrsLine, LrsMultiLine, LrsPoint};

/// Shifts every vertex measure by a constant delta. Geometry kind and
/// vertex positions are untouched.
#[derive(Debug)]
pub struct TranslateMeasure {
    delta: f64,
}

impl TranslateMeasure {
    /// Creates a new translation.
    #[must_use]
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }

    /// Executes the translation.
    ///
    /// # Errors
    ///
    /// Currently infallible for all geometry kinds; the `Result` return
    /// keeps the operation signature uniform.
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        Ok(map_points(geometry, |p| {
            p.with_measure(p.measure_or_zero() + self.delta)
        }))
    }
}

/// Linearly rescales vertex measures from the geometry's existing measure
/// range onto a new one, then shifts by a constant.
///
/// The old range is taken from the geometry's first and last vertex, so
/// interior measures map proportionally and the endpoints land exactly on
/// the new range (plus shift).
#[derive(Debug)]
pub struct ScaleMeasure {
    start_measure: f64,
    end_measure: f64,
    shift: f64,
}

impl ScaleMeasure {
    /// Creates a new rescale onto `[start_measure, end_measure]` with an
    /// additional constant shift.
    #[must_use]
    pub fn new(start_measure: f64, end_measure: f64, shift: f64) -> Self {
        Self {
            start_measure,
            end_measure,
            shift,
        }
    }

    /// Executes the rescale.
    ///
    /// A point operand has no range of its own and maps to the new end
    /// measure plus shift.
    ///
    /// # Errors
    ///
    /// `DegenerateConstruction` when the geometry's existing measure range
    /// is empty, leaving the scale factor undefined.
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        if let Geometry::Point(p) = geometry {
            return Ok(Geometry::Point(
                p.with_measure(self.end_measure + self.shift),
            ));
        }

        let old_start = geometry
            .as_lines()
            .first()
            .map_or(0.0, LrsLine::start_measure);
        let old_end = geometry
            .as_lines()
            .last()
            .map_or(0.0, LrsLine::end_measure);
        let old_span = old_end - old_start;
        if old_span.abs() < f64::EPSILON {
            return Err(GeometryError::DegenerateConstruction(format!(
                "cannot rescale a zero-width measure range at {old_start}"
            ))
            .into());
        }

        let factor = (self.end_measure - self.start_measure) / old_span;
        Ok(map_points(geometry, |p| {
            let m = (p.measure_or_zero() - old_start) * factor + self.start_measure + self.shift;
            p.with_measure(m)
        }))
    }
}

/// Clears the M slot of every vertex. Z survives, so a 3D geometry keeps
/// its Z-as-measure fallback.
#[derive(Debug, Default)]
pub struct ResetMeasure;

impl ResetMeasure {
    /// Creates a new reset.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the reset.
    ///
    /// # Errors
    ///
    /// Currently infallible for all geometry kinds; the `Result` return
    /// keeps the operation signature uniform.
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        Ok(map_points(geometry, LrsPoint::without_measure))
    }
}

/// Applies a per-vertex transform while preserving the container kind.
fn map_points<F>(geometry: &Geometry, f: F) -> Geometry
where
    F: Fn(&LrsPoint) -> LrsPoint,
{
    let map_line = |line: &LrsLine| {
        let mut out = LrsLine::new(line.srid());
        for p in line.points() {
            out.push(f(p));
        }
        out
    };
    match geometry {
        Geometry::Point(p) => Geometry::Point(f(p)),
        Geometry::LineString(line) => Geometry::LineString(map_line(line)),
        Geometry::MultiLineString(ml) => {
            let mut out = LrsMultiLine::new(ml.srid());
            for line in ml.lines() {
                out.add_line(map_line(line));
            }
            Geometry::MultiLineString(out)
        }
    }
}
