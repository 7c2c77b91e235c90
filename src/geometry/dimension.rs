/// Dimensional kind of a coordinate: which of Z and M are present.
///
/// The kind is load-bearing for the "3D-to-measured" conversion rule: a
/// point carrying Z but no M treats Z as its measure, and that fallback must
/// survive round trips rather than being normalized away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordDim {
    /// X and Y only.
    Xy,
    /// X, Y and a measure.
    Xym,
    /// X, Y and Z.
    Xyz,
    /// X, Y, Z and a measure.
    Xyzm,
}

impl CoordDim {
    /// Derives the kind from optional Z and M slots.
    #[must_use]
    pub fn from_slots(z: Option<f64>, m: Option<f64>) -> Self {
        match (z, m) {
            (None, None) => CoordDim::Xy,
            (None, Some(_)) => CoordDim::Xym,
            (Some(_), None) => CoordDim::Xyz,
            (Some(_), Some(_)) => CoordDim::Xyzm,
        }
    }

    /// Whether a measure can be read from this kind (directly or via the
    /// Z fallback).
    #[must_use]
    pub fn has_measure(self) -> bool {
        !matches!(self, CoordDim::Xy)
    }
}
