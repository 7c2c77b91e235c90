use crate::error::Result;
use crate::geometry::{LrsLine, LrsMultiLine, LrsPoint};
use crate::sink::{GeometryKind, GeometrySink};

/// A materialized geometry: the whole-value form handed between operations.
///
/// Lifetimes are call-scoped: a `Geometry` is built while draining one sink
/// stream and consumed by the next operation; there is no persistence layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LrsPoint),
    LineString(LrsLine),
    MultiLineString(LrsMultiLine),
}

impl Geometry {
    #[must_use]
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
        }
    }

    #[must_use]
    pub fn srid(&self) -> i32 {
        match self {
            Geometry::Point(p) => p.srid,
            Geometry::LineString(l) => l.srid(),
            Geometry::MultiLineString(ml) => ml.srid(),
        }
    }

    /// Total planar length; zero for points.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Geometry::Point(_) => 0.0,
            Geometry::LineString(l) => l.length(),
            Geometry::MultiLineString(ml) => ml.length(),
        }
    }

    /// The sub-lines of a line-typed geometry, as a slice of one for a
    /// LINESTRING.
    #[must_use]
    pub fn as_lines(&self) -> &[LrsLine] {
        match self {
            Geometry::Point(_) => &[],
            Geometry::LineString(l) => std::slice::from_ref(l),
            Geometry::MultiLineString(ml) => ml.lines(),
        }
    }

    /// Drives a sink over this geometry's vertices, producing the canonical
    /// event stream of the sink protocol.
    ///
    /// # Errors
    ///
    /// Propagates the first error the sink raises; traversal stops there.
    pub fn populate<S: GeometrySink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.set_srid(self.srid())?;
        self.populate_shape(sink)
    }

    /// Like [`Geometry::populate`] but without the leading `set_srid`, for
    /// feeding several geometries into one sink.
    pub fn populate_shape<S: GeometrySink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        match self {
            Geometry::Point(p) => {
                sink.begin_geometry(GeometryKind::Point)?;
                sink.begin_figure(p.x, p.y, p.z, p.m)?;
                sink.end_figure()?;
                sink.end_geometry()
            }
            Geometry::LineString(line) => populate_line(line, sink),
            Geometry::MultiLineString(ml) => {
                sink.begin_geometry(GeometryKind::MultiLineString)?;
                for line in ml.lines() {
                    populate_line(line, sink)?;
                }
                sink.end_geometry()
            }
        }
    }
}

fn populate_line<S: GeometrySink + ?Sized>(line: &LrsLine, sink: &mut S) -> Result<()> {
    sink.begin_geometry(GeometryKind::LineString)?;
    if let Some((first, rest)) = line.points().split_first() {
        sink.begin_figure(first.x, first.y, first.z, first.m)?;
        for p in rest {
            sink.add_line(p.x, p.y, p.z, p.m)?;
        }
        sink.end_figure()?;
    }
    sink.end_geometry()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{LinrefError, SinkError};

    fn pm(x: f64, y: f64, m: f64) -> LrsPoint {
        LrsPoint::with_measure_only(x, y, m, 0)
    }

    /// Records the event stream as compact strings for order assertions.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl GeometrySink for Recorder {
        fn set_srid(&mut self, srid: i32) -> Result<()> {
            self.events.push(format!("srid {srid}"));
            Ok(())
        }
        fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()> {
            self.events.push(format!("begin {}", kind.as_str()));
            Ok(())
        }
        fn begin_figure(&mut self, x: f64, y: f64, _z: Option<f64>, _m: Option<f64>) -> Result<()> {
            self.events.push(format!("figure {x} {y}"));
            Ok(())
        }
        fn add_line(&mut self, x: f64, y: f64, _z: Option<f64>, _m: Option<f64>) -> Result<()> {
            self.events.push(format!("line {x} {y}"));
            Ok(())
        }
        fn end_figure(&mut self) -> Result<()> {
            self.events.push("end figure".to_owned());
            Ok(())
        }
        fn end_geometry(&mut self) -> Result<()> {
            self.events.push("end geometry".to_owned());
            Ok(())
        }
    }

    #[test]
    fn populate_line_string_event_order() {
        let g = Geometry::LineString(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)],
            4326,
        ));
        let mut rec = Recorder::default();
        g.populate(&mut rec).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "srid 4326",
                "begin LINESTRING",
                "figure 0 0",
                "line 1 0",
                "end figure",
                "end geometry",
            ]
        );
    }

    #[test]
    fn populate_multi_line_nests_members() {
        let mut ml = LrsMultiLine::new(0);
        ml.add_line(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)],
            0,
        ));
        ml.add_line(LrsLine::from_points(
            vec![pm(2.0, 0.0, 2.0), pm(3.0, 0.0, 3.0)],
            0,
        ));
        let mut rec = Recorder::default();
        Geometry::MultiLineString(ml).populate(&mut rec).unwrap();
        let begins = rec
            .events
            .iter()
            .filter(|e| e.starts_with("begin"))
            .count();
        let ends = rec
            .events
            .iter()
            .filter(|e| *e == "end geometry")
            .count();
        assert_eq!(begins, 3); // collection + two members
        assert_eq!(begins, ends);
    }

    #[test]
    fn populate_empty_line_has_no_figure() {
        let g = Geometry::LineString(LrsLine::new(0));
        let mut rec = Recorder::default();
        g.populate(&mut rec).unwrap();
        assert!(!rec.events.iter().any(|e| e.starts_with("figure")));
    }

    #[test]
    fn populate_stops_on_sink_error() {
        struct FailsOnFigure;
        impl GeometrySink for FailsOnFigure {
            fn set_srid(&mut self, _srid: i32) -> Result<()> {
                Ok(())
            }
            fn begin_geometry(&mut self, _kind: GeometryKind) -> Result<()> {
                Ok(())
            }
            fn begin_figure(
                &mut self,
                _x: f64,
                _y: f64,
                _z: Option<f64>,
                _m: Option<f64>,
            ) -> Result<()> {
                Err(SinkError::InvalidCallSequence("test").into())
            }
            fn add_line(&mut self, _x: f64, _y: f64, _z: Option<f64>, _m: Option<f64>) -> Result<()> {
                Ok(())
            }
            fn end_figure(&mut self) -> Result<()> {
                Ok(())
            }
            fn end_geometry(&mut self) -> Result<()> {
                Ok(())
            }
        }
        let g = Geometry::LineString(LrsLine::from_points(
            vec![pm(0.0, 0.0, 0.0), pm(1.0, 0.0, 1.0)],
            0,
        ));
        let err = g.populate(&mut FailsOnFigure).unwrap_err();
        assert!(matches!(err, LinrefError::Sink(_)));
    }
}
