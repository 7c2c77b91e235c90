use crate::geometry::CoordDim;
use crate::math::{distance_2d, lerp};

/// Epsilon for comparing Z and M coordinates in equality checks.
///
/// X and Y are compared bit-exact; only the auxiliary coordinates get an
/// epsilon.
const COORD_EPS: f64 = 1e-8;

/// A point carrying optional Z and measure (M) coordinates.
///
/// The measure encodes position along a route. A point with Z but no M
/// treats Z as its measure ("3D-to-measured" fallback); writing a measure
/// back goes into whichever slot supplied it so the dimensional kind is
/// preserved.
#[derive(Debug, Clone, Copy)]
pub struct LrsPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
    pub srid: i32,
}

impl LrsPoint {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, y: f64, z: Option<f64>, m: Option<f64>, srid: i32) -> Self {
        Self { x, y, z, m, srid }
    }

    /// Creates a 2D+M point.
    #[must_use]
    pub fn with_measure_only(x: f64, y: f64, m: f64, srid: i32) -> Self {
        Self::new(x, y, None, Some(m), srid)
    }

    /// Dimensional kind of this point.
    #[must_use]
    pub fn dim(&self) -> CoordDim {
        CoordDim::from_slots(self.z, self.m)
    }

    /// The measure of this point: M when present, otherwise Z.
    #[must_use]
    pub fn measure(&self) -> Option<f64> {
        self.m.or(self.z)
    }

    /// The measure, defaulting to zero when neither M nor Z is present.
    #[must_use]
    pub fn measure_or_zero(&self) -> f64 {
        self.measure().unwrap_or(0.0)
    }

    /// Returns a copy with the measure rewritten into the slot that holds it.
    ///
    /// M-carrying points keep their kind; measured-via-Z points write into Z;
    /// plain 2D points gain an M slot.
    #[must_use]
    pub fn with_measure(&self, measure: f64) -> Self {
        let mut out = *self;
        if out.m.is_some() {
            out.m = Some(measure);
        } else if out.z.is_some() {
            out.z = Some(measure);
        } else {
            out.m = Some(measure);
        }
        out
    }

    /// Returns a copy with the M slot cleared. Z survives, so a 3D point
    /// keeps its Z-as-measure fallback.
    #[must_use]
    pub fn without_measure(&self) -> Self {
        Self { m: None, ..*self }
    }

    /// Planar distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &LrsPoint) -> f64 {
        distance_2d(self.x, self.y, other.x, other.y)
    }

    /// Whether this point lies within `tolerance` of `other` in the plane.
    #[must_use]
    pub fn is_within(&self, other: &LrsPoint, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    /// Interpolates a point on the segment `a`→`b` at the given measure.
    ///
    /// X and Y vary proportionally to the measure; Z is interpolated when
    /// both endpoints carry it. The result's measure slot holds `measure`.
    /// When the endpoint measures coincide the result snaps to `a`.
    #[must_use]
    pub fn interpolate_at_measure(a: &LrsPoint, b: &LrsPoint, measure: f64) -> LrsPoint {
        let (ma, mb) = (a.measure_or_zero(), b.measure_or_zero());
        if (mb - ma).abs() < f64::EPSILON {
            return a.with_measure(measure);
        }
        let t = (measure - ma) / (mb - ma);
        let z = match (a.z, b.z) {
            (Some(za), Some(zb)) => Some(lerp(za, zb, t)),
            _ => None,
        };
        LrsPoint {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            z,
            m: a.m.map(|_| measure),
            srid: a.srid,
        }
        .with_measure(measure)
    }
}

impl PartialEq for LrsPoint {
    /// Bit-exact on X and Y, epsilon on Z and M. SRID participates so points
    /// from different reference systems never compare equal.
    fn eq(&self, other: &Self) -> bool {
        fn opt_eq(a: Option<f64>, b: Option<f64>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => (a - b).abs() <= COORD_EPS,
                _ => false,
            }
        }
        self.x == other.x
            && self.y == other.y
            && opt_eq(self.z, other.z)
            && opt_eq(self.m, other.m)
            && self.srid == other.srid
    }
}
