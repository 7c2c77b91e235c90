pub mod dimension;
pub mod geom;
pub mod line;
pub mod multi_line;
pub mod point;

pub use dimension::CoordDim;
pub use geom::Geometry;
pub use line::LrsLine;
pub use multi_line::LrsMultiLine;
pub use point::LrsPoint;
