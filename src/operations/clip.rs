use crate::error::Result;
use crate::geometry::{Geometry, LrsLine, LrsPoint};
use crate::operations::locate::LocateAlongMeasure;
use crate::operations::{
    assemble, measure_eq, require_line_family, require_monotonic, trim_leading_overrun,
};
use crate::sink::{GeometryKind, GeometrySink};
use crate::LinrefError;

/// Clips a measured line geometry to a measure range.
///
/// The range is order-independent: `[s, e]` and `[e, s]` clip the same
/// portion, and both increasing and decreasing lines are handled. Boundary
/// points falling strictly between two vertices are interpolated
/// proportionally to M; an interpolated point landing within `tolerance` of
/// an existing vertex snaps to that vertex instead of inserting a
/// near-duplicate.
#[derive(Debug)]
pub struct ClipMeasure {
    start_measure: f64,
    end_measure: f64,
    tolerance: f64,
    retain_measure: bool,
}

impl ClipMeasure {
    /// Creates a new clip operation.
    #[must_use]
    pub fn new(start_measure: f64, end_measure: f64, tolerance: f64) -> Self {
        Self {
            start_measure,
            end_measure,
            tolerance,
            retain_measure: false,
        }
    }

    /// Keeps the clip measure verbatim at boundary points even when they
    /// snap to an existing vertex.
    #[must_use]
    pub fn retaining_measure(mut self) -> Self {
        self.retain_measure = true;
        self
    }

    /// Executes the clip.
    ///
    /// A range wholly outside the line's measure extent yields an empty
    /// result, not an error. Equal start and end measures collapse the
    /// result to a single located point.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `NotMonotonic` when a sub-line's measures reverse direction
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        require_line_family(geometry)?;
        require_monotonic(geometry)?;

        if measure_eq(self.start_measure, self.end_measure) {
            return match LocateAlongMeasure::new(self.start_measure, self.tolerance)
                .execute(geometry)
            {
                Ok(located) => Ok(located.into_geometry()),
                Err(LinrefError::Measure(_)) => {
                    Ok(Geometry::LineString(LrsLine::new(geometry.srid())))
                }
                Err(other) => Err(other),
            };
        }

        let mut sink = ClipSink::new(
            self.start_measure,
            self.end_measure,
            self.tolerance,
            self.retain_measure,
        );
        geometry.populate(&mut sink)?;
        let ClipSink {
            mut lines,
            point_candidate,
            ..
        } = sink;
        if matches!(geometry, Geometry::MultiLineString(_)) {
            trim_leading_overrun(&mut lines);
        }
        Ok(assemble(geometry.srid(), lines, point_candidate))
    }
}

/// Streaming clip sink: a before-range → in-range → after-range machine per
/// figure, driven purely by the incoming measures.
struct ClipSink {
    lo: f64,
    hi: f64,
    tolerance: f64,
    retain_measure: bool,
    prev: Option<LrsPoint>,
    figure: Vec<LrsPoint>,
    lines: Vec<LrsLine>,
    point_candidate: Option<LrsPoint>,
    srid: i32,
}

impl ClipSink {
    fn new(s: f64, e: f64, tolerance: f64, retain_measure: bool) -> Self {
        Self {
            lo: s.min(e),
            hi: s.max(e),
            tolerance,
            retain_measure,
            prev: None,
            figure: Vec::new(),
            lines: Vec::new(),
            point_candidate: None,
            srid: 0,
        }
    }

    fn inside(&self, m: f64) -> bool {
        (self.lo..=self.hi).contains(&m)
            || measure_eq(m, self.lo)
            || measure_eq(m, self.hi)
    }

    fn emit(&mut self, point: LrsPoint) {
        if let Some(last) = self.figure.last() {
            if last.x == point.x && last.y == point.y {
                return;
            }
        }
        self.figure.push(point);
    }

    /// Interpolated boundary point at `measure` on `p`→`q`, snapped to an
    /// endpoint within tolerance.
    fn boundary(&self, p: &LrsPoint, q: &LrsPoint, measure: f64) -> LrsPoint {
        let candidate = LrsPoint::interpolate_at_measure(p, q, measure);
        for vertex in [p, q] {
            if candidate.is_within(vertex, self.tolerance) {
                return if self.retain_measure {
                    vertex.with_measure(measure)
                } else {
                    *vertex
                };
            }
        }
        candidate
    }

    fn process_segment(&mut self, q: LrsPoint) {
        let Some(p) = self.prev else {
            self.prev = Some(q);
            return;
        };
        self.prev = Some(q);

        let mp = p.measure_or_zero();
        let mq = q.measure_or_zero();

        if measure_eq(mp, mq) {
            if self.inside(mq) {
                self.emit(p);
                self.emit(q);
            }
            return;
        }

        let increasing = mq > mp;
        let entirely_out = if increasing {
            mq < self.lo || mp > self.hi
        } else {
            mq > self.hi || mp < self.lo
        };
        if entirely_out {
            return;
        }

        if self.figure.is_empty() && !self.inside(mp) {
            let entry = if increasing { self.lo } else { self.hi };
            let point = self.boundary(&p, &q, entry);
            self.emit(point);
        }

        if self.inside(mq) {
            self.emit(q);
        } else {
            let exit = if increasing { self.hi } else { self.lo };
            let point = self.boundary(&p, &q, exit);
            self.emit(point);
        }
    }
}

impl GeometrySink for ClipSink {
    fn set_srid(&mut self, srid: i32) -> Result<()> {
        self.srid = srid;
        Ok(())
    }

    fn begin_geometry(&mut self, _kind: GeometryKind) -> Result<()> {
        Ok(())
    }

    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        let p = LrsPoint::new(x, y, z, m, self.srid);
        self.figure.clear();
        if self.inside(p.measure_or_zero()) {
            self.figure.push(p);
        }
        self.prev = Some(p);
        Ok(())
    }

    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        let q = LrsPoint::new(x, y, z, m, self.srid);
        self.process_segment(q);
        Ok(())
    }

    fn end_figure(&mut self) -> Result<()> {
        let figure = std::mem::take(&mut self.figure);
        self.prev = None;
        match figure.len() {
            0 => {}
            1 => {
                if self.point_candidate.is_none() {
                    self.point_candidate = figure.first().copied();
                }
            }
            _ => self.lines.push(LrsLine::from_points(figure, self.srid)),
        }
        Ok(())
    }

    fn end_geometry(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::wkt::parse;

    fn clip(wkt: &str, s: f64, e: f64) -> Geometry {
        let g = parse(wkt, 0).unwrap();
        ClipMeasure::new(s, e, 0.5).execute(&g).unwrap()
    }

    #[test]
    fn clip_interior_range_interpolates_boundaries() {
        let g = clip("LINESTRING (0 0 0, 10 0 10)", 2.0, 8.0);
        assert_eq!(g.to_string(), "LINESTRING (2 0 2, 8 0 8)");
    }

    #[test]
    fn clip_snaps_to_nearby_vertex() {
        // Boundary at measure 2 lands at x=2, within 0.5 of the vertex at
        // x=2.2 (measure 2.2): snap, keeping the vertex's own measure.
        let g = clip("LINESTRING (0 0 0, 2.2 0 2.2, 10 0 10)", 2.0, 10.0);
        assert_eq!(g.to_string(), "LINESTRING (2.2 0 2.2, 10 0 10)");
    }

    #[test]
    fn clip_retains_measure_at_snapped_boundary() {
        let g = parse("LINESTRING (0 0 0, 2.2 0 2.2, 10 0 10)", 0).unwrap();
        let clipped = ClipMeasure::new(2.0, 10.0, 0.5)
            .retaining_measure()
            .execute(&g)
            .unwrap();
        assert_eq!(clipped.to_string(), "LINESTRING (2.2 0 2, 10 0 10)");
    }

    #[test]
    fn clip_range_order_independent() {
        let a = clip("LINESTRING (0 0 0, 10 0 10)", 2.0, 8.0);
        let b = clip("LINESTRING (0 0 0, 10 0 10)", 8.0, 2.0);
        assert_eq!(a, b);
    }

    #[test]
    fn clip_decreasing_line() {
        let g = clip("LINESTRING (0 0 10, 10 0 0)", 2.0, 8.0);
        assert_eq!(g.to_string(), "LINESTRING (2 0 8, 8 0 2)");
    }

    #[test]
    fn clip_outside_range_is_empty() {
        let g = clip("LINESTRING (0 0 0, 10 0 10)", 20.0, 30.0);
        assert_eq!(g.to_string(), "LINESTRING EMPTY");
    }

    #[test]
    fn clip_equal_measures_collapses_to_point() {
        let g = clip("LINESTRING (0 0 0, 10 0 10)", 4.0, 4.0);
        assert_eq!(g.to_string(), "POINT (4 0 4)");
    }

    #[test]
    fn clip_respects_z_as_measure() {
        // Three-coordinate form: the third value is Z, serving as measure.
        let g = clip("LINESTRING (2 2 2, 2 4 4, 8 4 8)", 3.0, 8.0);
        assert_eq!(g.to_string(), "LINESTRING (2 3 3, 2 4 4, 8 4 8)");
    }

    #[test]
    fn clip_multi_line_drops_out_of_range_members() {
        let g = clip(
            "MULTILINESTRING ((1 1 1, 2 2 2, 3 3 3), (4 4 4, 5.125 5.125 5.125, 6 6 6), \
             (10 10 10, 11.25 11.25 11.25, 12 12 12))",
            2.0,
            10.0,
        );
        assert_eq!(
            g.to_string(),
            "MULTILINESTRING ((2 2 2, 3 3 3), (4 4 4, 5.125 5.125 5.125, 6 6 6))"
        );
    }

    #[test]
    fn clip_point_operand_is_rejected() {
        let g = parse("POINT (1 1 1)", 0).unwrap();
        assert!(ClipMeasure::new(0.0, 1.0, 0.5).execute(&g).is_err());
    }

    #[test]
    fn clip_non_monotonic_is_rejected() {
        let g = parse("LINESTRING (0 0 0, 5 0 9, 10 0 4)", 0).unwrap();
        assert!(ClipMeasure::new(0.0, 5.0, 0.5).execute(&g).is_err());
    }

    #[test]
    fn clip_complements_partition_the_vertex_multiset() {
        let source = "LINESTRING (0 0 0, 2 0 2, 5 0 5, 9 0 9, 10 0 10)";
        let g = parse(source, 0).unwrap();
        let middle = ClipMeasure::new(3.0, 8.0, 1e-12).execute(&g).unwrap();
        let before = ClipMeasure::new(0.0, 3.0, 1e-12).execute(&g).unwrap();
        let after = ClipMeasure::new(8.0, 10.0, 1e-12).execute(&g).unwrap();

        let mut xs: Vec<f64> = [&before, &middle, &after]
            .iter()
            .flat_map(|seg| seg.as_lines())
            .flat_map(|l| l.points().iter().map(|p| p.x))
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        // Original vertices plus the two cut points.
        let expected = [0.0, 2.0, 3.0, 5.0, 8.0, 9.0, 10.0];
        assert_eq!(xs.len(), expected.len());
        for (got, want) in xs.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn clip_multi_line_fully_outside_middle_sub_line() {
        let g = clip(
            "MULTILINESTRING ((0 0 0, 1 0 1), (5 0 5, 6 0 6), (9 0 9, 10 0 10))",
            4.5,
            6.5,
        );
        assert_eq!(g.to_string(), "LINESTRING (5 0 5, 6 0 6)");
    }

    #[test]
    fn clip_single_vertex_touch_yields_point() {
        let g = clip("LINESTRING (0 0 0, 10 0 10)", 10.0, 12.0);
        assert_eq!(g.to_string(), "POINT (10 0 10)");
    }
}
