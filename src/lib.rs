//! geoshift - Reproject vector shapes between coordinate reference systems
//! and split them at the antimeridian

pub mod config;
pub mod crs;
pub mod error;
pub mod geometry;

pub use crs::{Crs, MERCATOR_WIDTH};
pub use error::{GeoError, Result};
pub use geometry::{
    Affine, CrsGeometry, GeoVector, Transformer, antimeridian, azimuthal_from_geometry,
    cut_by_antimeridian, cut_by_antimeridian_with_offset, generate_transform, offset_shape,
    split_by_line, transform,
};
