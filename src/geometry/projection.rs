//! CRS transform engine
//!
//! Builds point-to-point transformers between two CRS and maps every
//! coordinate of a shape through them, optionally passing through pixel space
//! on either side via affine transforms.

use geo::{Centroid, Coord, Geometry, MapCoords};
use log::{debug, trace};
use proj4rs::Proj;

use super::affine::Affine;
use super::vector::CrsGeometry;
use crate::crs::Crs;
use crate::error::{GeoError, Result};

enum Kind {
    /// Source and destination are the same CRS
    Identity,
    Proj {
        src: Box<Proj>,
        dst: Box<Proj>,
        src_is_geo: bool,
        dst_is_geo: bool,
    },
}

/// Reusable coordinate mapping between two CRS.
///
/// Construction parses both CRS definitions; applying it to a point is cheap.
/// Geographic coordinates are in degrees on both sides, projected ones in the
/// units declared by the CRS.
pub struct Transformer {
    source: Crs,
    destination: Crs,
    kind: Kind,
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("source", &self.source.to_string())
            .field("destination", &self.destination.to_string())
            .field("identity", &matches!(self.kind, Kind::Identity))
            .finish()
    }
}

impl Transformer {
    pub fn new(source: &Crs, destination: &Crs) -> Result<Self> {
        let kind = if source == destination {
            // Still validate the definition so malformed CRS fail here.
            source.to_proj()?;
            Kind::Identity
        } else {
            let src = source.to_proj()?;
            let dst = destination.to_proj()?;
            Kind::Proj {
                src_is_geo: src.is_latlong(),
                dst_is_geo: dst.is_latlong(),
                src: Box::new(src),
                dst: Box::new(dst),
            }
        };

        debug!("Built transformer {} -> {}", source, destination);

        Ok(Self {
            source: source.clone(),
            destination: destination.clone(),
            kind,
        })
    }

    pub fn source(&self) -> &Crs {
        &self.source
    }

    pub fn destination(&self) -> &Crs {
        &self.destination
    }

    /// Transform a single coordinate.
    pub fn apply(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let Kind::Proj {
            src,
            dst,
            src_is_geo,
            dst_is_geo,
        } = &self.kind
        else {
            return Ok(coord);
        };

        let mut point = if *src_is_geo {
            (coord.x.to_radians(), coord.y.to_radians())
        } else {
            (coord.x, coord.y)
        };

        proj4rs::transform::transform(src, dst, &mut point)
            .map_err(|e| GeoError::Projection(format!("({}, {}): {}", coord.x, coord.y, e)))?;

        let (x, y) = if *dst_is_geo {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            point
        };

        if !x.is_finite() || !y.is_finite() {
            return Err(GeoError::Projection(format!(
                "({}, {}) has no finite image in {}",
                coord.x, coord.y, self.destination
            )));
        }

        Ok(Coord { x, y })
    }

    /// Transform every coordinate of a shape, keeping its structure.
    pub fn apply_shape(&self, shape: &Geometry<f64>) -> Result<Geometry<f64>> {
        if matches!(self.kind, Kind::Identity) {
            return Ok(shape.clone());
        }
        shape.try_map_coords(|c| self.apply(c))
    }
}

/// Build a reusable transformer from `source_crs` to `destination_crs`.
pub fn generate_transform(source_crs: &Crs, destination_crs: &Crs) -> Result<Transformer> {
    Transformer::new(source_crs, destination_crs)
}

/// Transform a shape from one CRS to another.
///
/// # Arguments
/// * `shape` - Shape to transform
/// * `source_crs` - CRS the shape is expressed in
/// * `destination_crs` - Target CRS, WGS84 if `None`
/// * `src_affine` - Input coordinates are relative to this affine (e.g. pixel space)
/// * `dst_affine` - Output coordinates are made relative to this affine
pub fn transform(
    shape: &Geometry<f64>,
    source_crs: &Crs,
    destination_crs: Option<&Crs>,
    src_affine: Option<&Affine>,
    dst_affine: Option<&Affine>,
) -> Result<Geometry<f64>> {
    let wgs84;
    let destination_crs = match destination_crs {
        Some(crs) => crs,
        None => {
            wgs84 = Crs::wgs84();
            &wgs84
        }
    };

    let pixel_to_crs = src_affine.map(Affine::inverse).transpose()?;
    let transformer = generate_transform(source_crs, destination_crs)?;

    let mut shape = match pixel_to_crs {
        Some(affine) => affine.apply_shape(shape),
        None => shape.clone(),
    };

    shape = transformer.apply_shape(&shape)?;

    if let Some(affine) = dst_affine {
        shape = affine.apply_shape(&shape);
    }

    trace!("Transformed shape {} -> {}", source_crs, destination_crs);
    Ok(shape)
}

/// Azimuthal equidistant CRS centered on the geometry's centroid.
pub fn azimuthal_from_geometry<G: CrsGeometry>(geometry: &G) -> Result<Crs> {
    let crs = geometry.crs();
    let shape = geometry.get_shape(crs)?;
    let centroid = shape.centroid().ok_or_else(|| {
        GeoError::InvalidGeometry("cannot compute the centroid of an empty geometry".to_string())
    })?;

    let center = generate_transform(crs, &Crs::wgs84())?.apply(centroid.0)?;
    debug!("Azimuthal center lon={} lat={}", center.x, center.y);

    let lat_0 = center.y.to_string();
    let lon_0 = center.x.to_string();
    Crs::from_params([
        ("proj", Some("aeqd")),
        ("lat_0", Some(lat_0.as_str())),
        ("lon_0", Some(lon_0.as_str())),
        ("ellps", Some("WGS84")),
        ("datum", Some("WGS84")),
        ("units", Some("m")),
        ("no_defs", None),
    ])
}
