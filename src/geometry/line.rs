use crate::geometry::LrsPoint;
use crate::math::slope::Slope;

/// Classification of a line by vertex count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// No vertices.
    Empty,
    /// A single degenerate vertex.
    Point,
    /// Two or more vertices.
    Line,
}

/// An ordered run of [`LrsPoint`]s sharing one SRID.
#[derive(Debug, Clone, PartialEq)]
pub struct LrsLine {
    points: Vec<LrsPoint>,
    srid: i32,
}

impl LrsLine {
    /// Creates an empty line.
    #[must_use]
    pub fn new(srid: i32) -> Self {
        Self {
            points: Vec::new(),
            srid,
        }
    }

    /// Creates a line from existing points.
    #[must_use]
    pub fn from_points(points: Vec<LrsPoint>, srid: i32) -> Self {
        Self { points, srid }
    }

    /// Appends a vertex.
    pub fn push(&mut self, point: LrsPoint) {
        self.points.push(point);
    }

    /// Appends a vertex unless it coincides with the current last vertex
    /// within `tolerance` (planar distance).
    pub fn push_deduped(&mut self, point: LrsPoint, tolerance: f64) {
        if let Some(last) = self.points.last() {
            if last.is_within(&point, tolerance) && last.measure() == point.measure() {
                return;
            }
        }
        self.points.push(point);
    }

    #[must_use]
    pub fn srid(&self) -> i32 {
        self.srid
    }

    #[must_use]
    pub fn points(&self) -> &[LrsPoint] {
        &self.points
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        match self.points.len() {
            0 => LineKind::Empty,
            1 => LineKind::Point,
            _ => LineKind::Line,
        }
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        self.kind() == LineKind::Line
    }

    #[must_use]
    pub fn first(&self) -> Option<&LrsPoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LrsPoint> {
        self.points.last()
    }

    /// Measure of the first vertex (Z fallback included), zero when empty.
    #[must_use]
    pub fn start_measure(&self) -> f64 {
        self.first().map_or(0.0, LrsPoint::measure_or_zero)
    }

    /// Measure of the last vertex (Z fallback included), zero when empty.
    #[must_use]
    pub fn end_measure(&self) -> f64 {
        self.last().map_or(0.0, LrsPoint::measure_or_zero)
    }

    /// Smallest and largest vertex measure, or `None` for empty lines.
    #[must_use]
    pub fn measure_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?;
        let mut min = first.measure_or_zero();
        let mut max = min;
        for p in &self.points[1..] {
            let m = p.measure_or_zero();
            min = min.min(m);
            max = max.max(m);
        }
        Some((min, max))
    }

    /// Total planar length: the sum of consecutive vertex distances.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// Whether measures never reverse direction along the line.
    ///
    /// Both non-decreasing and non-increasing runs are valid.
    #[must_use]
    pub fn is_measure_monotonic(&self) -> bool {
        let mut increasing = true;
        let mut decreasing = true;
        for w in self.points.windows(2) {
            let (a, b) = (w[0].measure_or_zero(), w[1].measure_or_zero());
            if b < a {
                increasing = false;
            }
            if b > a {
                decreasing = false;
            }
        }
        increasing || decreasing
    }

    /// Returns a copy with the vertex order reversed. Measures travel with
    /// their vertices and are not altered.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            srid: self.srid,
        }
    }

    /// Removes redundant interior vertices whose removal does not change the
    /// traced path.
    ///
    /// Vertex B between A and C is redundant iff the classified slopes of
    /// AB, BC and AC all agree (see [`Slope`]). The first and last vertices
    /// are never removed.
    #[must_use]
    pub fn remove_collinear(&self) -> Self {
        if self.points.len() < 3 {
            return self.clone();
        }
        let mut kept: Vec<LrsPoint> = Vec::with_capacity(self.points.len());
        kept.push(self.points[0]);
        for i in 1..self.points.len() - 1 {
            let a = kept[kept.len() - 1];
            let b = self.points[i];
            let c = self.points[i + 1];
            let ab = Slope::classify(a.x, a.y, b.x, b.y);
            let bc = Slope::classify(b.x, b.y, c.x, c.y);
            let ac = Slope::classify(a.x, a.y, c.x, c.y);
            if !(ab.approx_eq(bc) && bc.approx_eq(ac)) {
                kept.push(b);
            }
        }
        kept.push(self.points[self.points.len() - 1]);
        Self {
            points: kept,
            srid: self.srid,
        }
    }

    /// Consumes the line, returning its points.
    #[must_use]
    pub fn into_points(self) -> Vec<LrsPoint> {
        self.points
    }
}
