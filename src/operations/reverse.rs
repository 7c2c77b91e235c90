use crate::error::Result;
use crate::geometry::{Geometry, LrsMultiLine};
use crate::operations::require_line_family;

/// Reverses the traversal order of a line geometry.
///
/// Sub-line order flips along with the vertex order inside each sub-line,
/// so the geometry's start point becomes its end point. Measures travel
/// with their vertices; an increasing-measure line comes back decreasing.
#[derive(Debug, Default)]
pub struct ReverseSegment;

impl ReverseSegment {
    /// Creates a new reverse operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the reversal.
    ///
    /// # Errors
    ///
    /// `UnsupportedGeometryType` for point operands.
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        require_line_family(geometry)?;
        Ok(match geometry {
            Geometry::Point(p) => Geometry::Point(*p),
            Geometry::LineString(line) => Geometry::LineString(line.reversed()),
            Geometry::MultiLineString(ml) => {
                let mut out = LrsMultiLine::new(ml.srid());
                for line in ml.lines().iter().rev() {
                    out.add_line(line.reversed());
                }
                Geometry::MultiLineString(out)
            }
        })
    }
}
