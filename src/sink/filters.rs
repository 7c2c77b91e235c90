//! Forwarding filter sinks.
//!
//! Each filter wraps an inner sink and re-emits a reduced event stream,
//! demonstrating the pipeline composition the protocol is designed for:
//! `source → filter → builder`.

use crate::error::Result;
use crate::math::distance_2d;
use crate::sink::{Coordinates, GeometryKind, GeometrySink};

/// One buffered protocol event.
#[derive(Debug, Clone, Copy)]
enum Event {
    BeginGeometry(GeometryKind),
    BeginFigure(Coordinates),
    AddLine(Coordinates),
    EndFigure,
    EndGeometry,
}

fn replay<S: GeometrySink>(events: &[Event], sink: &mut S) -> Result<()> {
    for event in events {
        match *event {
            Event::BeginGeometry(kind) => sink.begin_geometry(kind)?,
            Event::BeginFigure(c) => sink.begin_figure(c.x, c.y, c.z, c.m)?,
            Event::AddLine(c) => sink.add_line(c.x, c.y, c.z, c.m)?,
            Event::EndFigure => sink.end_figure()?,
            Event::EndGeometry => sink.end_geometry()?,
        }
    }
    Ok(())
}

/// Drops member geometries that contain no figure at all.
///
/// Each geometry (root or collection member) is buffered until its matching
/// `end_geometry`; empty shapes are discarded instead of being forwarded.
pub struct EmptyShapeFilter<S> {
    inner: S,
    buffer: Vec<Event>,
    depth: usize,
    has_figure: bool,
}

impl<S: GeometrySink> EmptyShapeFilter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            depth: 0,
            has_figure: false,
        }
    }

    /// Returns the wrapped sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: GeometrySink> GeometrySink for EmptyShapeFilter<S> {
    fn set_srid(&mut self, srid: i32) -> Result<()> {
        self.inner.set_srid(srid)
    }

    fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()> {
        if self.depth == 1 {
            // Entering a member: start deciding about it afresh.
            self.has_figure = false;
        }
        self.depth += 1;
        self.buffer.push(Event::BeginGeometry(kind));
        Ok(())
    }

    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        self.has_figure = true;
        self.buffer
            .push(Event::BeginFigure(Coordinates::new(x, y, z, m)));
        Ok(())
    }

    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        self.buffer.push(Event::AddLine(Coordinates::new(x, y, z, m)));
        Ok(())
    }

    fn end_figure(&mut self) -> Result<()> {
        self.buffer.push(Event::EndFigure);
        Ok(())
    }

    fn end_geometry(&mut self) -> Result<()> {
        self.buffer.push(Event::EndGeometry);
        self.depth -= 1;
        if self.depth == 1 && !self.has_figure {
            // Drop the just-closed empty member: its events are the trailing
            // balanced begin/end pair in the buffer.
            let mut level = 0usize;
            let start = self
                .buffer
                .iter()
                .rposition(|e| match e {
                    Event::EndGeometry => {
                        level += 1;
                        false
                    }
                    Event::BeginGeometry(_) => {
                        level -= 1;
                        level == 0
                    }
                    _ => false,
                })
                .unwrap_or(0);
            self.buffer.truncate(start);
        }
        if self.depth == 0 {
            let events = std::mem::take(&mut self.buffer);
            replay(&events, &mut self.inner)?;
        }
        Ok(())
    }
}

/// Drops POINT member geometries, forwarding everything else unchanged.
pub struct PointFilter<S> {
    inner: S,
    skip_depth: Option<usize>,
    depth: usize,
}

impl<S: GeometrySink> PointFilter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            skip_depth: None,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn skipping(&self) -> bool {
        self.skip_depth.is_some()
    }
}

impl<S: GeometrySink> GeometrySink for PointFilter<S> {
    fn set_srid(&mut self, srid: i32) -> Result<()> {
        self.inner.set_srid(srid)
    }

    fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()> {
        self.depth += 1;
        if self.skipping() {
            return Ok(());
        }
        if kind == GeometryKind::Point {
            self.skip_depth = Some(self.depth);
            return Ok(());
        }
        self.inner.begin_geometry(kind)
    }

    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        if self.skipping() {
            return Ok(());
        }
        self.inner.begin_figure(x, y, z, m)
    }

    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        if self.skipping() {
            return Ok(());
        }
        self.inner.add_line(x, y, z, m)
    }

    fn end_figure(&mut self) -> Result<()> {
        if self.skipping() {
            return Ok(());
        }
        self.inner.end_figure()
    }

    fn end_geometry(&mut self) -> Result<()> {
        let was_skipping = self.skip_depth == Some(self.depth);
        self.depth -= 1;
        if was_skipping {
            self.skip_depth = None;
            return Ok(());
        }
        if self.skipping() {
            return Ok(());
        }
        self.inner.end_geometry()
    }
}

/// Drops figures whose planar length falls below a threshold.
pub struct ShortLineFilter<S> {
    inner: S,
    min_length: f64,
    figure: Vec<Coordinates>,
}

impl<S: GeometrySink> ShortLineFilter<S> {
    pub fn new(inner: S, min_length: f64) -> Self {
        Self {
            inner,
            min_length,
            figure: Vec::new(),
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: GeometrySink> GeometrySink for ShortLineFilter<S> {
    fn set_srid(&mut self, srid: i32) -> Result<()> {
        self.inner.set_srid(srid)
    }

    fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()> {
        self.inner.begin_geometry(kind)
    }

    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        self.figure.clear();
        self.figure.push(Coordinates::new(x, y, z, m));
        Ok(())
    }

    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()> {
        self.figure.push(Coordinates::new(x, y, z, m));
        Ok(())
    }

    fn end_figure(&mut self) -> Result<()> {
        let length: f64 = self
            .figure
            .windows(2)
            .map(|w| distance_2d(w[0].x, w[0].y, w[1].x, w[1].y))
            .sum();
        if length < self.min_length {
            return Ok(());
        }
        if let Some((first, rest)) = self.figure.split_first() {
            self.inner.begin_figure(first.x, first.y, first.z, first.m)?;
            for c in rest {
                self.inner.add_line(c.x, c.y, c.z, c.m)?;
            }
            self.inner.end_figure()?;
        }
        Ok(())
    }

    fn end_geometry(&mut self) -> Result<()> {
        self.inner.end_geometry()
    }
}
