use geo::{Coord, Geometry, MapCoords};
use std::str::FromStr;

use crate::error::{GeoError, Result};

/// A 2D affine transform between two coordinate spaces.
///
/// Maps (col, row) to (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
///
/// In GDAL geotransform order this is [c, a, b, f, d, e].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// Create from a GDAL-style geotransform array [c, a, b, f, d, e].
    pub fn from_gdal(gt: &[f64; 6]) -> Self {
        Self::new(gt[1], gt[2], gt[0], gt[4], gt[5], gt[3])
    }

    pub fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.a * col + self.b * row + self.c;
        let y = self.d * col + self.e * row + self.f;
        (x, y)
    }

    pub fn apply(&self, coord: Coord<f64>) -> Coord<f64> {
        let (x, y) = self.forward(coord.x, coord.y);
        Coord { x, y }
    }

    /// Map every coordinate of a shape through the forward transform.
    pub fn apply_shape(&self, shape: &Geometry<f64>) -> Geometry<f64> {
        let affine = *self;
        shape.map_coords(move |c| affine.apply(c))
    }

    pub fn inverse(&self) -> Result<Affine> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(GeoError::NonInvertibleTransform(format!(
                "determinant is {}",
                det
            )));
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }
}

/// Parses `a,b,c,d,e,f`.
impl FromStr for Affine {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| GeoError::Config(format!("invalid affine {:?}: {}", s, e)))?;

        match values.as_slice() {
            &[a, b, c, d, e, f] => Ok(Affine::new(a, b, c, d, e, f)),
            _ => Err(GeoError::Config(format!(
                "affine needs 6 coefficients, got {}",
                values.len()
            ))),
        }
    }
}
