pub mod clip;
pub mod locate;
pub mod measure;
pub mod merge;
pub mod offset;
pub mod populate;
pub mod reverse;
pub mod split;

pub use clip::ClipMeasure;
pub use locate::{LocateAlongMeasure, LocatedPoint};
pub use measure::{ResetMeasure, ScaleMeasure, TranslateMeasure};
pub use merge::{MergePosition, MergeSegments};
pub use offset::OffsetSegment;
pub use populate::PopulateMeasures;
pub use reverse::ReverseSegment;
pub use split::SplitMeasure;

use crate::error::{GeometryError, MeasureError, Result};
use crate::geometry::{Geometry, LrsLine, LrsMultiLine, LrsPoint};

/// Epsilon for comparing measure values.
pub(crate) const MEASURE_EPS: f64 = 1e-9;

/// Approximate equality of two measures.
pub(crate) fn measure_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= MEASURE_EPS * a.abs().max(b.abs()).max(1.0)
}

/// Rejects non-line operands for the segment operations.
pub(crate) fn require_line_family(geometry: &Geometry) -> Result<()> {
    match geometry {
        Geometry::Point(_) => Err(GeometryError::UnsupportedGeometryType {
            found: "POINT",
            expected: "LINESTRING or MULTILINESTRING",
        }
        .into()),
        Geometry::LineString(_) | Geometry::MultiLineString(_) => Ok(()),
    }
}

/// Rejects operands whose sub-lines carry non-monotonic measures.
pub(crate) fn require_monotonic(geometry: &Geometry) -> Result<()> {
    for line in geometry.as_lines() {
        if !line.is_measure_monotonic() {
            return Err(MeasureError::NotMonotonic.into());
        }
    }
    Ok(())
}

/// Assembles collected sub-lines into the leanest container.
///
/// One surviving sub-line becomes a LINESTRING, several a MULTILINESTRING; a
/// lone vertex becomes a POINT, and nothing at all an empty LINESTRING.
pub(crate) fn assemble(srid: i32, lines: Vec<LrsLine>, point: Option<LrsPoint>) -> Geometry {
    match lines.len() {
        0 => point.map_or_else(
            || Geometry::LineString(LrsLine::new(srid)),
            Geometry::Point,
        ),
        1 => Geometry::LineString(
            lines
                .into_iter()
                .next()
                .unwrap_or_else(|| LrsLine::new(srid)),
        ),
        _ => {
            let mut ml = LrsMultiLine::new(srid);
            for line in lines {
                ml.add_line(line);
            }
            Geometry::MultiLineString(ml)
        }
    }
}

/// The trailing sub-line ordering correction shared by clip and split.
///
/// When the collection is multi-part and the first sub-line's end measure
/// runs past the last sub-line's end measure, the first sub-line is
/// truncated by relocating its end via interpolation at that measure; when
/// the measure coincides with the first sub-line's start, the sub-line
/// degenerates to the boundary point alone and falls out of the collection.
pub(crate) fn trim_leading_overrun(lines: &mut Vec<LrsLine>) {
    if lines.len() < 2 {
        return;
    }
    let anomaly = match lines.last() {
        Some(last) => last.end_measure(),
        None => return,
    };
    let first = &lines[0];
    let increasing = first.end_measure() >= first.start_measure();
    let overruns = if increasing {
        first.end_measure() > anomaly && !measure_eq(first.end_measure(), anomaly)
    } else {
        first.end_measure() < anomaly && !measure_eq(first.end_measure(), anomaly)
    };
    if !overruns {
        return;
    }
    if measure_eq(first.start_measure(), anomaly) {
        // Degenerates to the boundary point alone; a one-point line cannot
        // live in a multi-line, so the sub-line is removed outright.
        lines.remove(0);
        return;
    }
    let truncated = truncate_at_measure(first, anomaly, increasing);
    if truncated.is_line() {
        lines[0] = truncated;
    } else {
        lines.remove(0);
    }
}

/// Keeps the leading run of `line` up to `measure`, closing it with an
/// interpolated boundary point.
fn truncate_at_measure(line: &LrsLine, measure: f64, increasing: bool) -> LrsLine {
    let mut out = LrsLine::new(line.srid());
    let points = line.points();
    for (i, p) in points.iter().enumerate() {
        let m = p.measure_or_zero();
        let passed = if increasing { m >= measure } else { m <= measure };
        if passed {
            if measure_eq(m, measure) {
                out.push(*p);
            } else if i > 0 {
                out.push(LrsPoint::interpolate_at_measure(&points[i - 1], p, measure));
            }
            break;
        }
        out.push(*p);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pm(x: f64, y: f64, m: f64) -> LrsPoint {
        LrsPoint::with_measure_only(x, y, m, 0)
    }

    fn line(points: Vec<LrsPoint>) -> LrsLine {
        LrsLine::from_points(points, 0)
    }

    #[test]
    fn assemble_collapses_single_line() {
        let g = assemble(0, vec![line(vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)])], None);
        assert!(matches!(g, Geometry::LineString(_)));
    }

    #[test]
    fn assemble_empty_is_empty_linestring() {
        let g = assemble(3, Vec::new(), None);
        assert_eq!(g.to_string(), "LINESTRING EMPTY");
        assert_eq!(g.srid(), 3);
    }

    #[test]
    fn assemble_lone_point() {
        let g = assemble(0, Vec::new(), Some(pm(1.0, 1.0, 5.0)));
        assert!(matches!(g, Geometry::Point(_)));
    }

    #[test]
    fn trim_truncates_overrunning_first_sub_line() {
        let mut lines = vec![
            line(vec![pm(0.0, 0.0, 0.0), pm(10.0, 0.0, 10.0)]),
            line(vec![pm(20.0, 0.0, 4.0), pm(30.0, 0.0, 6.0)]),
        ];
        trim_leading_overrun(&mut lines);
        assert_eq!(lines.len(), 2);
        // First sub-line relocated to end at measure 6.
        assert!((lines[0].end_measure() - 6.0).abs() < 1e-9);
        assert!((lines[0].last().unwrap().x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn trim_degenerates_when_measures_coincide() {
        let mut lines = vec![
            line(vec![pm(0.0, 0.0, 5.0), pm(10.0, 0.0, 10.0)]),
            line(vec![pm(20.0, 0.0, 2.0), pm(30.0, 0.0, 5.0)]),
        ];
        trim_leading_overrun(&mut lines);
        assert_eq!(lines.len(), 1);
        assert!((lines[0].end_measure() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn trim_leaves_nested_ranges_alone() {
        let mut lines = vec![
            line(vec![pm(0.0, 0.0, 0.0), pm(10.0, 0.0, 4.0)]),
            line(vec![pm(20.0, 0.0, 4.0), pm(30.0, 0.0, 6.0)]),
        ];
        trim_leading_overrun(&mut lines);
        assert_eq!(lines.len(), 2);
        assert!((lines[0].end_measure() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn measure_eq_scales_with_magnitude() {
        assert!(measure_eq(1000.0, 1000.0 + 1e-7));
        assert!(!measure_eq(1.0, 1.001));
    }
}
