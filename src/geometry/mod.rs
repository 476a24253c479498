pub mod affine;
pub mod antimeridian;
pub mod projection;
pub mod split;
pub mod vector;

pub use affine::Affine;
pub use antimeridian::{
    antimeridian, cut_by_antimeridian, cut_by_antimeridian_with_offset, offset_shape,
};
pub use projection::{Transformer, azimuthal_from_geometry, generate_transform, transform};
pub use split::split_by_line;
pub use vector::{CrsGeometry, GeoVector};

use geo::Geometry;

/// Human readable name of a geometry variant, for error messages
pub(crate) fn kind(shape: &Geometry<f64>) -> &'static str {
    match shape {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
