//! Coordinate reference system values
//!
//! A `Crs` is either an ordered list of proj parameters
//! (`+proj=merc +lon_0=0 +no_defs`) or an EPSG authority code. It is only a
//! description; projection objects are built from it on demand.

use proj4rs::Proj;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{GeoError, Result};

/// Radius of the Web Mercator sphere in meters
pub const MERCATOR_RADIUS: f64 = 6378137.0;

/// Full x extent of Web Mercator, from longitude -180° to 180°
pub const MERCATOR_WIDTH: f64 = 2.0 * std::f64::consts::PI * MERCATOR_RADIUS;

/// Full x extent of a geographic CRS in degrees
pub const GEOGRAPHIC_WIDTH: f64 = 360.0;

#[derive(Debug, Clone, PartialEq)]
enum Definition {
    Epsg(u32),
    Params(Vec<(String, Option<String>)>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    definition: Definition,
}

impl Crs {
    /// WGS84 longitude/latitude in degrees, the canonical geographic CRS
    pub fn wgs84() -> Self {
        Self::params(&[
            ("proj", Some("longlat")),
            ("datum", Some("WGS84")),
            ("no_defs", None),
        ])
    }

    /// Spherical Web Mercator in meters
    pub fn web_mercator() -> Self {
        Self::params(&[
            ("proj", Some("merc")),
            ("a", Some("6378137")),
            ("b", Some("6378137")),
            ("lat_ts", Some("0")),
            ("lon_0", Some("0")),
            ("x_0", Some("0")),
            ("y_0", Some("0")),
            ("k", Some("1")),
            ("units", Some("m")),
            ("no_defs", None),
        ])
    }

    pub fn from_epsg(code: u32) -> Self {
        Self {
            definition: Definition::Epsg(code),
        }
    }

    /// Build a CRS from key/value pairs; flags such as `no_defs` carry `None`.
    pub fn from_params<K, V, I>(params: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let params: Vec<(String, Option<String>)> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.map(Into::into)))
            .collect();

        if params.is_empty() {
            return Err(GeoError::Config("empty CRS definition".to_string()));
        }
        if let Some((key, _)) = params.iter().find(|(k, _)| k.is_empty()) {
            return Err(GeoError::Config(format!("invalid parameter name {:?}", key)));
        }
        if !params.iter().any(|(k, _)| k == "proj") {
            return Err(GeoError::Config("missing `proj` parameter".to_string()));
        }

        Ok(Self {
            definition: Definition::Params(params),
        })
    }

    fn params(pairs: &[(&str, Option<&str>)]) -> Self {
        Self {
            definition: Definition::Params(
                pairs
                    .iter()
                    .map(|&(k, v)| (k.to_string(), v.map(str::to_string)))
                    .collect(),
            ),
        }
    }

    pub fn epsg(&self) -> Option<u32> {
        match self.definition {
            Definition::Epsg(code) => Some(code),
            Definition::Params(_) => None,
        }
    }

    /// Look up a proj parameter. Flags return `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        match &self.definition {
            Definition::Params(params) => params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_deref().unwrap_or("")),
            Definition::Epsg(_) => None,
        }
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Build the proj4rs projection object for this CRS.
    pub(crate) fn to_proj(&self) -> Result<Proj> {
        let definition = self.to_string();
        let proj = match self.definition {
            Definition::Epsg(_) => Proj::from_user_string(&definition),
            Definition::Params(_) => Proj::from_proj_string(&definition),
        };
        proj.map_err(|e| GeoError::Config(format!("{}: {}", definition, e)))
    }

    pub fn is_geographic(&self) -> Result<bool> {
        Ok(self.to_proj()?.is_latlong())
    }

    /// Central meridian in degrees (`lon_0`, 0 when not given).
    pub fn central_meridian(&self) -> f64 {
        self.get_f64("lon_0").unwrap_or(0.0)
    }

    /// Width of one full turn of longitude at the equator, in CRS units.
    ///
    /// Measured over the half turn centered on the central meridian and
    /// doubled, so both ends stay inside the projection's longitude range.
    pub fn full_width(&self) -> Result<f64> {
        if self.is_geographic()? {
            return Ok(GEOGRAPHIC_WIDTH);
        }

        let center = self.central_meridian();
        let transformer = crate::geometry::generate_transform(&Crs::wgs84(), self)?;
        let west = transformer.apply(geo::coord! { x: center - 90.0, y: 0.0 })?;
        let east = transformer.apply(geo::coord! { x: center + 90.0, y: 0.0 })?;
        let width = 2.0 * (east.x - west.x);

        if !width.is_finite() || width <= f64::EPSILON {
            return Err(GeoError::Config(format!(
                "{} has no usable longitude extent",
                self
            )));
        }
        Ok(width)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.definition {
            Definition::Epsg(code) => write!(f, "EPSG:{}", code),
            Definition::Params(params) => {
                for (i, (key, value)) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match value {
                        Some(v) => write!(f, "+{}={}", key, v)?,
                        None => write!(f, "+{}", key)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Crs {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if let Some(code) = s
            .strip_prefix("EPSG:")
            .or_else(|| s.strip_prefix("epsg:"))
        {
            return code
                .trim()
                .parse()
                .map(Crs::from_epsg)
                .map_err(|_| GeoError::Config(format!("invalid EPSG code {:?}", code)));
        }

        let mut params = Vec::new();
        for token in s.split_whitespace() {
            let token = token
                .strip_prefix('+')
                .ok_or_else(|| GeoError::Config(format!("expected `+` before {:?}", token)))?;
            match token.split_once('=') {
                Some((key, value)) => params.push((key, Some(value))),
                None => params.push((token, None)),
            }
        }

        Crs::from_params(params)
    }
}

impl TryFrom<String> for Crs {
    type Error = GeoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}
