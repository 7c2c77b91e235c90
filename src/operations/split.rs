use crate::error::Result;
use crate::geometry::{Geometry, LrsLine, LrsPoint};
use crate::operations::{
    assemble, measure_eq, require_line_family, require_monotonic, trim_leading_overrun,
};

/// Splits a measured line geometry at a measure into two segments.
///
/// A vertex whose measure equals the split measure lands in both segments,
/// so the two halves share their junction point. A split measure falling
/// strictly inside a segment inserts an interpolated junction vertex into
/// both halves, snapped to a nearby vertex within `tolerance`.
#[derive(Debug)]
pub struct SplitMeasure {
    measure: f64,
    tolerance: f64,
    split_point: Option<LrsPoint>,
}

impl SplitMeasure {
    /// Creates a new split operation.
    #[must_use]
    pub fn new(measure: f64, tolerance: f64) -> Self {
        Self {
            measure,
            tolerance,
            split_point: None,
        }
    }

    /// Supplies the junction coordinates directly, so a caller that already
    /// located the split point does not pay for interpolating it again.
    #[must_use]
    pub fn with_split_point(mut self, point: LrsPoint) -> Self {
        self.split_point = Some(point);
        self
    }

    /// Executes the split, returning the segment before the measure and
    /// the segment after it, in that order.
    ///
    /// A split measure outside the line's extent leaves one side empty; an
    /// empty side comes back as `LINESTRING EMPTY`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `NotMonotonic` when a sub-line's measures reverse direction
    pub fn execute(&self, geometry: &Geometry) -> Result<(Geometry, Geometry)> {
        require_line_family(geometry)?;
        require_monotonic(geometry)?;

        let mut before = Collector::default();
        let mut after = Collector::default();

        for line in geometry.as_lines() {
            let increasing = line.end_measure() >= line.start_measure();
            let mut fig_before: Vec<LrsPoint> = Vec::new();
            let mut fig_after: Vec<LrsPoint> = Vec::new();
            let mut prev: Option<LrsPoint> = None;

            for &point in line.points() {
                let m = point.measure_or_zero();
                if let Some(p) = prev {
                    let straddles = if increasing {
                        p.measure_or_zero() < self.measure && m > self.measure
                    } else {
                        p.measure_or_zero() > self.measure && m < self.measure
                    };
                    if straddles
                        && !measure_eq(p.measure_or_zero(), self.measure)
                        && !measure_eq(m, self.measure)
                    {
                        let junction = self.junction(&p, &point);
                        emit(&mut fig_before, junction);
                        emit(&mut fig_after, junction);
                    }
                }
                if measure_eq(m, self.measure) {
                    emit(&mut fig_before, point);
                    emit(&mut fig_after, point);
                } else if (increasing && m < self.measure) || (!increasing && m > self.measure) {
                    emit(&mut fig_before, point);
                } else {
                    emit(&mut fig_after, point);
                }
                prev = Some(point);
            }

            before.close(fig_before, line.srid());
            after.close(fig_after, line.srid());
        }

        trim_leading_overrun(&mut after.lines);
        Ok((
            assemble(geometry.srid(), before.lines, before.point),
            assemble(geometry.srid(), after.lines, after.point),
        ))
    }

    /// Junction at the split measure on `p`→`q`, snapped to an endpoint
    /// within tolerance. A pre-located split point short-circuits the
    /// interpolation.
    fn junction(&self, p: &LrsPoint, q: &LrsPoint) -> LrsPoint {
        if let Some(point) = self.split_point {
            return point;
        }
        let candidate = LrsPoint::interpolate_at_measure(p, q, self.measure);
        for vertex in [p, q] {
            if candidate.is_within(vertex, self.tolerance) {
                return *vertex;
            }
        }
        candidate
    }
}

#[derive(Default)]
struct Collector {
    lines: Vec<LrsLine>,
    point: Option<LrsPoint>,
}

impl Collector {
    fn close(&mut self, figure: Vec<LrsPoint>, srid: i32) {
        match figure.len() {
            0 => {}
            1 => {
                if self.point.is_none() {
                    self.point = figure.first().copied();
                }
            }
            _ => self.lines.push(LrsLine::from_points(figure, srid)),
        }
    }
}

fn emit(figure: &mut Vec<LrsPoint>, point: LrsPoint) {
    if let Some(last) = figure.last() {
        if last.x == point.x && last.y == point.y {
            return;
        }
    }
    figure.push(point);
}
