use crate::error::{GeometryError, Result};
use crate::geometry::{Geometry, LrsLine, LrsMultiLine, LrsPoint};
use crate::math::bearing::{azimuth, bisect_bearings, normalize_angle, translate_along};
use crate::math::TOLERANCE;
use crate::operations::require_line_family;

/// Constructs the parallel curve of a measured line at a fixed planar
/// distance.
///
/// A positive offset falls on the left of the direction of travel, a
/// negative one on the right. Straight runs translate perpendicular to
/// their bearing; gentle corners get a single miter vertex on the angle
/// bisector, lengthened so both neighbouring segments stay at the offset
/// distance. A sharp corner (vertex angle of 90° or less) on the outer
/// side of the bend is bevelled with perpendicular projections of both
/// segments plus a bisector point, which keeps the curve within the offset
/// distance instead of spiking along the miter.
///
/// Measures ride along unchanged: each output vertex carries the Z and M
/// of the source vertex it was projected from.
#[derive(Debug)]
pub struct OffsetSegment {
    offset: f64,
    tolerance: f64,
}

impl OffsetSegment {
    /// Creates a new offset operation. `tolerance` controls merging of
    /// near-coincident output vertices.
    #[must_use]
    pub fn new(offset: f64, tolerance: f64) -> Self {
        Self { offset, tolerance }
    }

    /// Executes the offset. Container kind is preserved; every sub-line is
    /// offset independently.
    ///
    /// # Errors
    ///
    /// - `UnsupportedGeometryType` for point operands
    /// - `DegenerateConstruction` when a sub-line collapses below two
    ///   distinct vertices, before or after offsetting
    pub fn execute(&self, geometry: &Geometry) -> Result<Geometry> {
        require_line_family(geometry)?;
        Ok(match geometry {
            Geometry::Point(p) => Geometry::Point(*p),
            Geometry::LineString(line) => Geometry::LineString(self.offset_line(line)?),
            Geometry::MultiLineString(ml) => {
                let mut out = LrsMultiLine::new(ml.srid());
                for line in ml.lines() {
                    out.add_line(self.offset_line(line)?);
                }
                Geometry::MultiLineString(out)
            }
        })
    }

    fn offset_line(&self, line: &LrsLine) -> Result<LrsLine> {
        // Coincident vertices carry no direction; drop them up front so
        // every remaining segment has a bearing.
        let mut pts: Vec<LrsPoint> = Vec::with_capacity(line.point_count());
        for &p in line.points() {
            if let Some(last) = pts.last() {
                if last.is_within(&p, TOLERANCE) {
                    continue;
                }
            }
            pts.push(p);
        }
        let simplified = LrsLine::from_points(pts, line.srid()).remove_collinear();
        let points = simplified.points();
        if points.len() < 2 {
            return Err(GeometryError::DegenerateConstruction(
                "cannot offset a line with fewer than two distinct vertices".into(),
            )
            .into());
        }

        let mut bearings = Vec::with_capacity(points.len() - 1);
        for w in points.windows(2) {
            let b = azimuth(w[0].x, w[0].y, w[1].x, w[1].y).ok_or_else(|| {
                GeometryError::DegenerateConstruction(
                    "zero-length segment survived vertex dedup".into(),
                )
            })?;
            bearings.push(b);
        }

        let mut out = LrsLine::new(line.srid());
        let last_index = points.len() - 1;
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                self.emit(&mut out, p, normalize_angle(bearings[0] - 90.0), self.offset);
            } else if i == last_index {
                self.emit(
                    &mut out,
                    p,
                    normalize_angle(bearings[i - 1] - 90.0),
                    self.offset,
                );
            } else {
                self.corner(&mut out, p, bearings[i - 1], bearings[i]);
            }
        }

        if out.is_line() {
            Ok(out)
        } else {
            Err(GeometryError::DegenerateConstruction(
                "offset curve collapsed below two vertices".into(),
            )
            .into())
        }
    }

    /// Offsets an interior vertex: miter on the bisector, or a bevel when
    /// the bend is sharp and the offset falls on its outer side.
    fn corner(&self, out: &mut LrsLine, p: &LrsPoint, b_in: f64, b_out: f64) {
        let delta = normalize_angle(b_out - b_in);
        let sharp = (90.0..=270.0).contains(&delta);
        let outer =
            (delta < 180.0 && self.offset > 0.0) || (delta > 180.0 && self.offset < 0.0);
        if sharp && outer {
            self.emit(out, p, normalize_angle(b_in - 90.0), self.offset);
            self.emit(
                out,
                p,
                normalize_angle(bisect_bearings(b_in, b_out) - 90.0),
                self.offset,
            );
            self.emit(out, p, normalize_angle(b_out - 90.0), self.offset);
            return;
        }

        let angle = normalize_angle(bisect_bearings(b_in, b_out) - 90.0);
        let span = normalize_angle(b_in - angle);
        let s = span.to_radians().sin();
        // A full reversal gives a zero sine; fall back to the plain
        // perpendicular distance rather than blowing up the miter.
        let distance = if s.abs() < 1e-9 {
            self.offset
        } else {
            self.offset / s
        };
        self.emit(out, p, angle, distance);
    }

    fn emit(&self, out: &mut LrsLine, source: &LrsPoint, angle: f64, distance: f64) {
        let (x, y) = translate_along(source.x, source.y, angle, distance);
        out.push_deduped(
            LrsPoint::new(x, y, source.z, source.m, source.srid),
            self.tolerance,
        );
    }
}
