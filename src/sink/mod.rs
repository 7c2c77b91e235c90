pub mod builder;
pub mod filters;

use crate::error::{Result, SinkError};

pub use builder::GeometryBuilder;
pub use filters::{EmptyShapeFilter, PointFilter, ShortLineFilter};

/// Geometry kind announced by `begin_geometry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    LineString,
    MultiLineString,
}

impl GeometryKind {
    /// Static display name, matching the WKT tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::MultiLineString => "MULTILINESTRING",
        }
    }
}

/// One coordinate quadruple travelling through the sink protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coordinates {
    #[must_use]
    pub fn new(x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Self {
        Self { x, y, z, m }
    }
}

/// Push-based consumer of a geometry build event stream.
///
/// The call contract is order-significant: `set_srid` once, then repeating
/// `begin_geometry → [begin_figure, add_line*, end_figure]* → end_geometry`,
/// with nested `begin_geometry` calls for collection members. Sinks are
/// composable; a sink's output calls can feed another sink to form a
/// pipeline.
pub trait GeometrySink {
    /// Announces the spatial reference of the stream. Called exactly once,
    /// before any geometry.
    fn set_srid(&mut self, srid: i32) -> Result<()>;

    /// Opens a geometry of the given kind. Nested calls open collection
    /// members.
    fn begin_geometry(&mut self, kind: GeometryKind) -> Result<()>;

    /// Opens a figure at its first vertex.
    fn begin_figure(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()>;

    /// Adds a straight-line vertex to the open figure.
    fn add_line(&mut self, x: f64, y: f64, z: Option<f64>, m: Option<f64>) -> Result<()>;

    /// Adds a circular-arc segment to the open figure.
    ///
    /// Straight-segment-only sinks reject this; the default implementation
    /// fails with [`SinkError::UnsupportedOperation`].
    fn add_circular_arc(&mut self, mid: Coordinates, end: Coordinates) -> Result<()> {
        let _ = (mid, end);
        Err(SinkError::UnsupportedOperation("circular arc").into())
    }

    /// Closes the open figure.
    fn end_figure(&mut self) -> Result<()>;

    /// Closes the innermost open geometry.
    fn end_geometry(&mut self) -> Result<()>;
}
