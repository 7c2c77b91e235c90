use crate::error::Result;
use crate::geometry::{Geometry, LrsLine, LrsMultiLine};

/// Rewrites every vertex measure in proportion to distance travelled along
/// the geometry.
///
/// The default range is the natural one, `0` at the start through the total
/// planar length at the end. Cumulative distance keeps running across
/// sub-line boundaries; the gaps between sub-lines contribute nothing.
/// Container kind is preserved, a single-member MULTILINESTRING stays a
/// MULTILINESTRING.
#[derive(Debug, Default)]
pub struct PopulateMeasures {
    range: Option<(f64, f64)>,
}

impl PopulateMeasures {
    /// Creates a populate operation over the natural range.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit start and end measure instead of the natural range.
    #[must_use]
    pub fn with_range(start: f64, end: f64) -> Self {
        Self {
            range: Some((start, end)),
        }
    }

    /// Executes the repopulation.
    ///
    /// A zero-length geometry gets the start measure everywhere. Point
    /// operands get the start measure.
    ///
    /// # Errors
    ///
    /// Currently infallible for all geometry kinds; the `Result` return
    /// keeps the operation signature uniform.
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        let total = geometry.length();
        let (start, end) = self.range.unwrap_or((0.0, total));

        match geometry {
            Geometry::Point(p) => Ok(Geometry::Point(p.with_measure(start))),
            Geometry::LineString(line) => {
                let mut cum = 0.0;
                Ok(Geometry::LineString(populate_line(
                    line, &mut cum, total, start, end,
                )))
            }
            Geometry::MultiLineString(ml) => {
                let mut out = LrsMultiLine::new(ml.srid());
                let mut cum = 0.0;
                for line in ml.lines() {
                    out.add_line(populate_line(line, &mut cum, total, start, end));
                }
                Ok(Geometry::MultiLineString(out))
            }
        }
    }
}

fn populate_line(line: &LrsLine, cum: &mut f64, total: f64, start: f64, end: f64) -> LrsLine {
    let mut out = LrsLine::new(line.srid());
    let mut prev = None;
    for p in line.points() {
        if let Some(prev) = prev {
            *cum += p.distance_to(prev);
        }
        let m = if total > 0.0 {
            start + (*cum / total) * (end - start)
        } else {
            start
        };
        out.push(p.with_measure(m));
        prev = Some(p);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::wkt::parse;

    fn measures(g: &Geometry) -> Vec<f64> {
        g.as_lines()
            .iter()
            .flat_map(|l| l.points().iter().map(|p| p.measure_or_zero()))
            .collect()
    }

    #[test]
    fn natural_range_runs_zero_to_length() {
        let g = parse("LINESTRING (0 0, 3 0, 3 4)", 0).unwrap();
        let out = PopulateMeasures::new().execute(&g).unwrap();
        let ms = measures(&out);
        assert!((ms[0]).abs() < 1e-12);
        assert!((ms[1] - 3.0).abs() < 1e-12);
        assert!((ms[2] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn explicit_range_interpolates_by_distance() {
        let g = parse("LINESTRING (0 0, 3 0, 3 4)", 0).unwrap();
        let out = PopulateMeasures::with_range(100.0, 170.0).execute(&g).unwrap();
        let ms = measures(&out);
        assert!((ms[0] - 100.0).abs() < 1e-12);
        assert!((ms[1] - 130.0).abs() < 1e-12);
        assert!((ms[2] - 170.0).abs() < 1e-12);
    }

    #[test]
    fn decreasing_range_is_allowed() {
        let g = parse("LINESTRING (0 0, 10 0)", 0).unwrap();
        let out = PopulateMeasures::with_range(10.0, 0.0).execute(&g).unwrap();
        let ms = measures(&out);
        assert!((ms[0] - 10.0).abs() < 1e-12);
        assert!(ms[1].abs() < 1e-12);
    }

    #[test]
    fn cumulative_distance_spans_sub_lines() {
        // Two 10-unit sub-lines with a gap between them; the gap does not
        // advance the measure.
        let g = parse("MULTILINESTRING ((0 0, 10 0), (20 0, 30 0))", 0).unwrap();
        let out = PopulateMeasures::with_range(0.0, 20.0).execute(&g).unwrap();
        let ms = measures(&out);
        assert!((ms[0]).abs() < 1e-12);
        assert!((ms[1] - 10.0).abs() < 1e-12);
        assert!((ms[2] - 10.0).abs() < 1e-12);
        assert!((ms[3] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn existing_measures_are_overwritten_in_place() {
        // Z-as-measure input keeps its dimensional kind.
        let g = parse("LINESTRING (0 0 99, 10 0 98)", 0).unwrap();
        let out = PopulateMeasures::new().execute(&g).unwrap();
        match &out {
            Geometry::LineString(l) => {
                assert!(l.points().iter().all(|p| p.m.is_none()));
                assert!((l.points()[1].z.unwrap() - 10.0).abs() < 1e-12);
            }
            _ => panic!("expected LINESTRING"),
        }
    }

    #[test]
    fn container_kind_is_preserved() {
        let g = parse("MULTILINESTRING ((0 0, 10 0))", 0).unwrap();
        let out = PopulateMeasures::new().execute(&g).unwrap();
        assert!(matches!(out, Geometry::MultiLineString(_)));
    }

    #[test]
    fn zero_length_gets_start_everywhere() {
        let g = parse("LINESTRING (5 5, 5 5)", 0).unwrap();
        let out = PopulateMeasures::with_range(3.0, 9.0).execute(&g).unwrap();
        assert!(measures(&out).iter().all(|m| (m - 3.0).abs() < 1e-12));
    }
}
