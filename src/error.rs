use thiserror::Error;

/// Top-level error type for the linref LRS kernel.
#[derive(Debug, Error)]
pub enum LinrefError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Measure(#[from] MeasureError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Wkt(#[from] WktError),
}

/// Errors related to geometry operands and construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("unsupported geometry type {found}, expected {expected}")]
    UnsupportedGeometryType {
        found: &'static str,
        expected: &'static str,
    },

    #[error("SRID mismatch: {left} vs {right}")]
    SridMismatch { left: i32, right: i32 },

    #[error("degenerate geometry construction: {0}")]
    DegenerateConstruction(String),
}

/// Errors related to measure (M) values.
#[derive(Debug, Error)]
pub enum MeasureError {
    #[error("measure {measure} is out of range [{min}, {max}]")]
    OutOfRange { measure: f64, min: f64, max: f64 },

    #[error("measures along the line are not monotonic")]
    NotMonotonic,
}

/// Errors related to the sink event protocol.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unsupported sink operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("invalid sink call sequence: {0}")]
    InvalidCallSequence(&'static str),
}

/// Errors raised while parsing well-known text.
#[derive(Debug, Error)]
pub enum WktError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected token at offset {offset}: expected {expected}")]
    Unexpected {
        offset: usize,
        expected: &'static str,
    },

    #[error("invalid number at offset {offset}")]
    InvalidNumber { offset: usize },

    #[error("unknown geometry tag `{0}`")]
    UnknownTag(String),
}

/// Convenience type alias for results using [`LinrefError`].
pub type Result<T> = std::result::Result<T, LinrefError>;
