use crate::error::{GeometryError, Result, SinkError};
use crate::geometry::{Geometry, LrsLine, LrsMultiLine, LrsPoint};
use crate::sink::{GeometryKind, GeometrySink};

/// Materializes a [`Geometry`] from a sink event stream.
///
/// The builder enforces the call contract: figures only inside an open
/// geometry, balanced begin/end pairs, collection members only inside a
/// MULTILINESTRING. On any violation the stream fails and no partial
/// geometry is ever exposed; [`GeometryBuilder::finish`] only yields a value
/// for a completed stream.
#[derive(Debug, Default)]
pub struct GeometryBuilder {
    srid: Option<i32>,
    stack: Vec<GeometryKind>,
    figure: Option<Vec<LrsPoint>>,
    lines: Vec<LrsLine>,
    points: Vec<LrsPoint>,
    root: Option<GeometryKind>,
    finished: Option<Geometry>,
}

impl GeometryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the builder, returning the completed geometry.
    ///
    /// # Errors
    ///
    /// Fails when the stream never completed a root geometry.
    pub fn finish(self) -> Result<Geometry> {
        self.finished
            .ok_or_else(|| SinkError::InvalidCallSequence("incomplete event stream").into())
    }

    fn open_kind(&self) -> Result<GeometryKind> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| SinkError::InvalidCallSequence("no open geometry").into())
    }

    fn finalize(&mut self, root: GeometryKind) -> Result<()> {
        let srid = self.srid.unwrap_or(0);
        let geometry = match root {
            GeometryKind::Point => {
                let p = self.points.pop().ok_or_else(|| {
                    GeometryError::DegenerateConstruction("point geometry with no vertex".into())
                })?;
                Geometry::Point(p)
            }
            GeometryKind::LineString => match self.lines.len() {
                0 => Geometry::LineString(LrsLine::new(srid)),
                1 => Geometry::LineString(self.lines.remove(0)),
                _ => {
                    return Err(
                        SinkError::InvalidCallSequence("multiple figures in a LINESTRING").into(),
                    )
                }
            },
            GeometryKind::MultiLineString => {
                let mut ml = LrsMultiLine::new(srid);
                for line in self.lines.drain(..) {
                    ml.add_line(line);
                }
                Geometry::MultiLineString(ml)
            }
        };
        self.finished = Some(geometry);
        Ok(())
    }
}

impl GeometrySink for GeometryBuilder {
    fn set_srid(&mut self, srid: i32) -> Result<()> {
        if !self.stack.is_empty() {
            return Err(SinkError::InvalidCallSequence("set_srid inside a geometry").into());
        }
        self.srid = Some(srid);
        Ok(())
    }

    fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()> {
        if self.figure.is_some() {
            return Err(SinkError::InvalidCallSequence("begin_geometry inside a figure").into());
        }
        match self.stack.last() {
            None => {
                if self.finished.is_some() {
                    return Err(
                        SinkError::InvalidCallSequence("stream continues after completion").into(),
                    );
                }
                self.root = Some(kind);
            }
            Some(GeometryKind::MultiLineString) => {
                if kind != GeometryKind::LineString {
                    return Err(SinkError::InvalidCallSequence(
                        "MULTILINESTRING members must be LINESTRING",
                    )
                    .into());
                }
            }
            Some(_) => {
                return Err(
                    SinkError::InvalidCallSequence("nested geometry in a leaf geometry").into(),
                )
            }
        }
        self.stack.push(kind);
        Ok(())
    }

    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        let kind = self.open_kind()?;
        if kind == GeometryKind::MultiLineString {
            return Err(
                SinkError::InvalidCallSequence("figure directly inside a collection").into(),
            );
        }
        if self.figure.is_some() {
            return Err(SinkError::InvalidCallSequence("figure already open").into());
        }
        let srid = self.srid.unwrap_or(0);
        self.figure = Some(vec![LrsPoint::new(x, y, z, m, srid)]);
        Ok(())
    }

    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        let kind = self.open_kind()?;
        if kind == GeometryKind::Point {
            return Err(SinkError::InvalidCallSequence("add_line on a point figure").into());
        }
        let srid = self.srid.unwrap_or(0);
        match self.figure.as_mut() {
            Some(points) => {
                points.push(LrsPoint::new(x, y, z, m, srid));
                Ok(())
            }
            None => Err(SinkError::InvalidCallSequence("add_line outside a figure").into()),
        }
    }

    fn end_figure(&mut self) -> Result<()> {
        let kind = self.open_kind()?;
        let points = self
            .figure
            .take()
            .ok_or_else(|| SinkError::InvalidCallSequence("end_figure without a figure"))?;
        let srid = self.srid.unwrap_or(0);
        if kind == GeometryKind::Point {
            if points.len() != 1 {
                return Err(SinkError::InvalidCallSequence("point figure must hold one vertex").into());
            }
            self.points.extend(points);
        } else {
            self.lines.push(LrsLine::from_points(points, srid));
        }
        Ok(())
    }

    fn end_geometry(&mut self) -> Result<()> {
        if self.figure.is_some() {
            return Err(SinkError::InvalidCallSequence("end_geometry inside a figure").into());
        }
        let kind = self
            .stack
            .pop()
            .ok_or_else(|| SinkError::InvalidCallSequence("end_geometry without begin"))?;
        if self.stack.is_empty() {
            self.finalize(kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_line_string() {
        let mut b = GeometryBuilder::new();
        b.set_srid(4326).unwrap();
        b.begin_geometry(GeometryKind::LineString).unwrap();
        b.begin_figure(0.0, 0.0, None, Some(0.0)).unwrap();
        b.add_line(1.0, 1.0, None, Some(10.0)).unwrap();
        b.end_figure().unwrap();
        b.end_geometry().unwrap();
        let g = b.finish().unwrap();
        assert_eq!(g.srid(), 4326);
        let line = match g {
            Geometry::LineString(l) => l,
            _ => panic!("expected LINESTRING"),
        };
        assert_eq!(line.point_count(), 2);
        assert!((line.end_measure() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn round_trips_a_multi_line() {
        let mut b = GeometryBuilder::new();
        b.set_srid(0).unwrap();
        b.begin_geometry(GeometryKind::MultiLineString).unwrap();
        for start in [0.0, 5.0] {
            b.begin_geometry(GeometryKind::LineString).unwrap();
            b.begin_figure(start, 0.0, None, Some(start)).unwrap();
            b.add_line(start + 1.0, 0.0, None, Some(start + 1.0)).unwrap();
            b.end_figure().unwrap();
            b.end_geometry().unwrap();
        }
        b.end_geometry().unwrap();
        let g = b.finish().unwrap();
        match g {
            Geometry::MultiLineString(ml) => assert_eq!(ml.line_count(), 2),
            _ => panic!("expected MULTILINESTRING"),
        }
    }

    #[test]
    fn degenerate_member_is_dropped_by_admission() {
        let mut b = GeometryBuilder::new();
        b.set_srid(0).unwrap();
        b.begin_geometry(GeometryKind::MultiLineString).unwrap();
        b.begin_geometry(GeometryKind::LineString).unwrap();
        b.begin_figure(1.0, 1.0, None, None).unwrap();
        b.end_figure().unwrap();
        b.end_geometry().unwrap();
        b.end_geometry().unwrap();
        match b.finish().unwrap() {
            Geometry::MultiLineString(ml) => assert!(ml.is_empty()),
            _ => panic!("expected MULTILINESTRING"),
        }
    }

    #[test]
    fn figure_outside_geometry_fails() {
        let mut b = GeometryBuilder::new();
        b.set_srid(0).unwrap();
        assert!(b.begin_figure(0.0, 0.0, None, None).is_err());
    }

    #[test]
    fn unbalanced_stream_yields_nothing() {
        let mut b = GeometryBuilder::new();
        b.set_srid(0).unwrap();
        b.begin_geometry(GeometryKind::LineString).unwrap();
        assert!(b.finish().is_err());
    }

    #[test]
    fn point_member_inside_collection_fails() {
        let mut b = GeometryBuilder::new();
        b.set_srid(0).unwrap();
        b.begin_geometry(GeometryKind::MultiLineString).unwrap();
        assert!(b.begin_geometry(GeometryKind::Point).is_err());
    }

    #[test]
    fn empty_line_string_materializes() {
        let mut b = GeometryBuilder::new();
        b.set_srid(7).unwrap();
        b.begin_geometry(GeometryKind::LineString).unwrap();
        b.end_geometry().unwrap();
        match b.finish().unwrap() {
            Geometry::LineString(l) => {
                assert_eq!(l.point_count(), 0);
                assert_eq!(l.srid(), 7);
            }
            _ => panic!("expected LINESTRING"),
        }
    }
}
