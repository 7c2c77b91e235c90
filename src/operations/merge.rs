use crate::error::{GeometryError, Result};
use crate::geometry::{Geometry, LrsLine, LrsPoint};
use crate::operations::{assemble, require_line_family};

/// How the endpoints of two line geometries touch, within tolerance.
///
/// "Start" and "End" refer to vertex order, not measure order. `BothEnds`
/// means the two geometries close a loop start-to-start and end-to-end;
/// `CrossEnds` means each geometry's start touches the other's end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePosition {
    StartStart,
    StartEnd,
    EndStart,
    EndEnd,
    BothEnds,
    CrossEnds,
    None,
}

/// Merges two measured line geometries into one at their touching
/// endpoints.
///
/// The operands are reoriented so the junction falls end-to-start, then
/// fused into a single path; the junction vertex is taken from the first
/// operand and the second operand's duplicate is dropped. Non-touching
/// operands are collected into a MULTILINESTRING instead.
#[derive(Debug)]
pub struct MergeSegments {
    tolerance: f64,
}

impl MergeSegments {
    /// Creates a new merge operation.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Classifies how the operands' endpoints touch.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `SridMismatch` when the operands disagree on SRID
    pub fn position(&self, first: &Geometry, second: &Geometry) -> Result<MergePosition> {
        require_line_family(first)?;
        require_line_family(second)?;
        if first.srid() != second.srid() {
            return Err(GeometryError::SridMismatch {
                left: first.srid(),
                right: second.srid(),
            }
            .into());
        }

        let (Some(s1), Some(e1), Some(s2), Some(e2)) = (
            start_point(first),
            end_point(first),
            start_point(second),
            end_point(second),
        ) else {
            return Ok(MergePosition::None);
        };

        let ss = s1.is_within(s2, self.tolerance);
        let se = s1.is_within(e2, self.tolerance);
        let es = e1.is_within(s2, self.tolerance);
        let ee = e1.is_within(e2, self.tolerance);

        Ok(match (ss, se, es, ee) {
            (true, _, _, true) => MergePosition::BothEnds,
            (_, true, true, _) => MergePosition::CrossEnds,
            (_, _, true, _) => MergePosition::EndStart,
            (_, true, _, _) => MergePosition::StartEnd,
            (true, _, _, _) => MergePosition::StartStart,
            (_, _, _, true) => MergePosition::EndEnd,
            _ => MergePosition::None,
        })
    }

    /// Executes the merge.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `SridMismatch` when the operands disagree on SRID
    pub fn execute(&self, first: &Geometry, second: &Geometry) -> Result<Geometry> {
        let position = self.position(first, second)?;
        let srid = first.srid();
        let lines1 = first.as_lines().to_vec();
        let lines2 = second.as_lines().to_vec();

        let (head, tail) = match position {
            MergePosition::EndStart | MergePosition::CrossEnds => (lines1, lines2),
            MergePosition::StartEnd => (lines2, lines1),
            MergePosition::StartStart | MergePosition::BothEnds => {
                (reverse_lines(lines1), lines2)
            }
            MergePosition::EndEnd => (lines1, reverse_lines(lines2)),
            MergePosition::None => {
                let mut all = lines1;
                all.extend(lines2);
                return Ok(assemble(srid, all, None));
            }
        };

        Ok(assemble(srid, fuse(head, tail, self.tolerance), None))
    }
}

fn start_point(geometry: &Geometry) -> Option<&LrsPoint> {
    geometry.as_lines().first().and_then(LrsLine::first)
}

fn end_point(geometry: &Geometry) -> Option<&LrsPoint> {
    geometry.as_lines().last().and_then(LrsLine::last)
}

/// Reverses a whole line collection: member order and vertex order both
/// flip, so the collection's start becomes its end.
fn reverse_lines(mut lines: Vec<LrsLine>) -> Vec<LrsLine> {
    lines.reverse();
    lines.iter().map(LrsLine::reversed).collect()
}

/// Joins `tail` onto `head` at the junction: `head`'s last sub-line absorbs
/// `tail`'s first sub-line, dropping the duplicated junction vertex.
fn fuse(mut head: Vec<LrsLine>, tail: Vec<LrsLine>, tolerance: f64) -> Vec<LrsLine> {
    let mut tail = tail.into_iter();
    if let (Some(last), Some(joining)) = (head.last_mut(), tail.next()) {
        let mut points = joining.into_points().into_iter();
        if let (Some(junction), Some(incoming)) = (last.last(), points.as_slice().first()) {
            if junction.is_within(incoming, tolerance) {
                let _ = points.next();
            }
        }
        for point in points {
            last.push(point);
        }
    }
    head.extend(tail);
    head
}
