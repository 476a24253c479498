use geo::Geometry;
use serde::{Deserialize, Serialize};

use super::projection::transform;
use crate::crs::Crs;
use crate::error::Result;

/// Anything that holds a shape bound to a CRS.
pub trait CrsGeometry {
    /// The CRS the shape is currently expressed in
    fn crs(&self) -> &Crs;

    /// The raw shape, reprojected into `crs` if needed
    fn get_shape(&self, crs: &Crs) -> Result<Geometry<f64>>;
}

/// A shape together with the CRS it is expressed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoVector {
    shape: Geometry<f64>,
    crs: Crs,
}

impl GeoVector {
    pub fn new(shape: Geometry<f64>, crs: Crs) -> Self {
        Self { shape, crs }
    }

    pub fn shape(&self) -> &Geometry<f64> {
        &self.shape
    }

    pub fn into_shape(self) -> Geometry<f64> {
        self.shape
    }

    /// Same geometry expressed in another CRS
    pub fn reproject(&self, crs: &Crs) -> Result<GeoVector> {
        Ok(GeoVector::new(self.get_shape(crs)?, crs.clone()))
    }
}

impl CrsGeometry for GeoVector {
    fn crs(&self) -> &Crs {
        &self.crs
    }

    fn get_shape(&self, crs: &Crs) -> Result<Geometry<f64>> {
        if *crs == self.crs {
            return Ok(self.shape.clone());
        }
        transform(&self.shape, &self.crs, Some(crs), None, None)
    }
}
