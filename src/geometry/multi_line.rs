use crate::geometry::{LrsLine, LrsPoint};

/// An ordered collection of [`LrsLine`]s forming one logical geometry.
///
/// Invariant: only lines with at least two vertices are admitted; degenerate
/// one-point "lines" are silently rejected by [`LrsMultiLine::add_line`].
#[derive(Debug, Clone, PartialEq)]
pub struct LrsMultiLine {
    lines: Vec<LrsLine>,
    srid: i32,
}

impl LrsMultiLine {
    /// Creates an empty multi-line.
    #[must_use]
    pub fn new(srid: i32) -> Self {
        Self {
            lines: Vec::new(),
            srid,
        }
    }

    /// Adds a sub-line, rejecting anything not classified as a line.
    ///
    /// Returns whether the line was admitted.
    pub fn add_line(&mut self, line: LrsLine) -> bool {
        if line.is_line() {
            self.lines.push(line);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn srid(&self) -> i32 {
        self.srid
    }

    #[must_use]
    pub fn lines(&self) -> &[LrsLine] {
        &self.lines
    }

    #[must_use]
    pub fn lines_mut(&mut self) -> &mut Vec<LrsLine> {
        &mut self.lines
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Exactly one sub-line.
    #[must_use]
    pub fn is_single_line(&self) -> bool {
        self.lines.len() == 1
    }

    /// Aggregate length: the sum of sub-line lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.lines.iter().map(LrsLine::length).sum()
    }

    /// First vertex of the first sub-line.
    #[must_use]
    pub fn first_point(&self) -> Option<&LrsPoint> {
        self.lines.first().and_then(LrsLine::first)
    }

    /// Last vertex of the last sub-line.
    #[must_use]
    pub fn last_point(&self) -> Option<&LrsPoint> {
        self.lines.last().and_then(LrsLine::last)
    }

    /// Consumes the collection, returning its sub-lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<LrsLine> {
        self.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pm(x: f64, y: f64, m: f64) -> LrsPoint {
        LrsPoint::with_measure_only(x, y, m, 0)
    }

    #[test]
    fn rejects_degenerate_sub_lines() {
        let mut ml = LrsMultiLine::new(0);
        assert!(!ml.add_line(LrsLine::new(0)));
        assert!(!ml.add_line(LrsLine::from_points(vec![pm(0.0, 0.0, 0.0)], 0)));
        assert!(ml.add_line(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)],
            0
        )));
        assert_eq!(ml.line_count(), 1);
    }

    #[test]
    fn aggregate_length() {
        let mut ml = LrsMultiLine::new(0);
        ml.add_line(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(3.0, 4.0, 5.0)],
            0,
        ));
        ml.add_line(LrsLine::from_points(
            vec![pm(10.0, 0.0, 5.0), pm(10.0, 2.0, 7.0)],
            0,
        ));
        assert!((ml.length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn endpoint_accessors_span_sub_lines() {
        let mut ml = LrsMultiLine::new(0);
        ml.add_line(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)],
            0,
        ));
        ml.add_line(LrsLine::from_points(
            vec![pm(4.0, 0.0, 4.0), pm(5.0, 0.0, 5.0)],
            0,
        ));
        assert!((ml.first_point().unwrap().x).abs() < 1e-12);
        assert!((ml.last_point().unwrap().x - 5.0).abs() < 1e-12);
    }
}
