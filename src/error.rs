use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Malformed or unsupported CRS parameters.
    #[error("Invalid CRS: {0}")]
    Config(String),

    #[error("Projection failed: {0}")]
    Projection(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Non-invertible affine transform: {0}")]
    NonInvertibleTransform(String),

    /// The shape crosses the antimeridian more than once.
    #[error("Unsupported topology: split produced {pieces} pieces, at most 2 are supported")]
    UnsupportedTopology { pieces: usize },

    #[error("Unsupported: {0}")]
    Unsupported(String),
}
