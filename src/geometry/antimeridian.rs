//! Antimeridian handling
//!
//! Shapes crossing ±180° are split at the antimeridian and the east piece is
//! shifted one full CRS width west so both pieces sit next to each other.
//!
//! Limitations: shapes crossing more than once are rejected, holes stay at
//! their original position when the exterior is offset, and only polygons can
//! be offset.

use geo::{Geometry, GeometryCollection, LineString, MapCoords, Polygon};
use log::debug;

use super::split::split_by_line;
use super::vector::{CrsGeometry, GeoVector};
use super::kind;
use crate::crs::Crs;
use crate::error::{GeoError, Result};

/// Web Mercator latitude limit; keeps the reference line finite in
/// cylindrical projections.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.0511287798066;

/// Latitude step used to densify the antimeridian line
const DENSIFY_STEP_DEG: f64 = 5.0;

/// The antimeridian as a line in WGS84, densified so it stays accurate once
/// reprojected into CRS where meridians are curved.
pub fn antimeridian() -> GeoVector {
    let mut coords = vec![(180.0, -MAX_MERCATOR_LATITUDE)];
    let mut lat = -85.0;
    while lat <= 85.0 {
        coords.push((180.0, lat));
        lat += DENSIFY_STEP_DEG;
    }
    coords.push((180.0, MAX_MERCATOR_LATITUDE));

    GeoVector::new(LineString::from(coords).into(), Crs::wgs84())
}

/// Translate a polygon's exterior ring by `(-x_offset, -y_offset)`.
///
/// Interior rings are returned untouched and other geometry types are
/// rejected with `GeoError::Unsupported`.
pub fn offset_shape(shape: &Geometry<f64>, x_offset: f64, y_offset: f64) -> Result<Geometry<f64>> {
    match shape {
        Geometry::Polygon(polygon) => {
            let exterior = polygon
                .exterior()
                .map_coords(move |c| geo::coord! { x: c.x - x_offset, y: c.y - y_offset });
            Ok(Polygon::new(exterior, polygon.interiors().to_vec()).into())
        }
        other => Err(GeoError::Unsupported(format!("offsetting a {}", kind(other)))),
    }
}

/// Split a geometry at the antimeridian, shifting the east piece by the full
/// width of the geometry's CRS.
///
/// Returns the geometry unchanged when it does not cross, otherwise a
/// two-member `GeometryCollection` (west piece, shifted east piece) in the
/// original CRS.
pub fn cut_by_antimeridian<G: CrsGeometry>(geometry: &G) -> Result<GeoVector> {
    cut(geometry, None)
}

/// Like [`cut_by_antimeridian`] with an explicit x offset for the east piece.
pub fn cut_by_antimeridian_with_offset<G: CrsGeometry>(
    geometry: &G,
    x_offset: f64,
) -> Result<GeoVector> {
    cut(geometry, Some(x_offset))
}

fn cut<G: CrsGeometry>(geometry: &G, x_offset: Option<f64>) -> Result<GeoVector> {
    let crs = geometry.crs().clone();
    let shape = geometry.get_shape(&crs)?;

    let Geometry::LineString(line) = antimeridian().get_shape(&crs)? else {
        return Err(GeoError::InvalidGeometry(
            "antimeridian did not reproject to a line".to_string(),
        ));
    };

    let pieces = split_by_line(&shape, &line)?;
    match pieces.as_slice() {
        [] => Err(GeoError::InvalidGeometry(
            "cannot split an empty geometry".to_string(),
        )),
        [_] => Ok(GeoVector::new(shape, crs)),
        [west, east] => {
            let x_offset = match x_offset {
                Some(offset) => offset,
                None => crs.full_width()?,
            };
            debug!("Split {} at the antimeridian, offset {}", kind(&shape), x_offset);

            let east = offset_shape(east, x_offset, 0.0)?;
            Ok(GeoVector::new(
                Geometry::GeometryCollection(GeometryCollection(vec![west.clone(), east])),
                crs,
            ))
        }
        _ => Err(GeoError::UnsupportedTopology {
            pieces: pieces.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::{GEOGRAPHIC_WIDTH, MERCATOR_WIDTH};
    use approx::assert_relative_eq;
    use geo::{BoundingRect, Point};

    fn polygon(coords: Vec<(f64, f64)>) -> Polygon<f64> {
        Polygon::new(LineString::from(coords), vec![])
    }

    fn bounds(shape: &Geometry<f64>) -> (f64, f64, f64, f64) {
        let r = shape.bounding_rect().unwrap();
        (r.min().x, r.min().y, r.max().x, r.max().y)
    }

    fn assert_bounds(shape: &Geometry<f64>, expected: (f64, f64, f64, f64), eps: f64) {
        let actual = bounds(shape);
        assert_relative_eq!(actual.0, expected.0, epsilon = eps);
        assert_relative_eq!(actual.1, expected.1, epsilon = eps);
        assert_relative_eq!(actual.2, expected.2, epsilon = eps);
        assert_relative_eq!(actual.3, expected.3, epsilon = eps);
    }

    fn pieces(v: &GeoVector) -> &[Geometry<f64>] {
        match v.shape() {
            Geometry::GeometryCollection(gc) => &gc.0,
            other => panic!("expected a collection, got {:?}", other),
        }
    }

    #[test]
    fn test_antimeridian_line() {
        let Geometry::LineString(line) = antimeridian().into_shape() else {
            panic!("expected a line");
        };
        assert!(line.0.iter().all(|c| c.x == 180.0));
        assert_eq!(line.0.first().unwrap().y, -MAX_MERCATOR_LATITUDE);
        assert_eq!(line.0.last().unwrap().y, MAX_MERCATOR_LATITUDE);
        assert!(line.0.windows(2).all(|w| w[0].y < w[1].y));
    }

    #[test]
    fn test_offset_shape_shifts_exterior_only() {
        let shape: Geometry<f64> = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0)])],
        )
        .into();

        let shifted = offset_shape(&shape, 3.0, -1.5).unwrap();
        let (Geometry::Polygon(before), Geometry::Polygon(after)) = (&shape, &shifted) else {
            panic!("expected polygons");
        };

        for (a, b) in before.exterior().0.iter().zip(after.exterior().0.iter()) {
            assert_eq!(b.x, a.x - 3.0);
            assert_eq!(b.y, a.y + 1.5);
        }
        assert_eq!(before.interiors(), after.interiors());
    }

    #[test]
    fn test_offset_shape_rejects_non_polygons() {
        let line: Geometry<f64> = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]).into();
        assert!(matches!(
            offset_shape(&line, 1.0, 0.0),
            Err(GeoError::Unsupported(_))
        ));
    }

    #[test]
    fn test_one_hemisphere_is_unchanged() {
        let v = GeoVector::new(
            polygon(vec![(10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0)]).into(),
            Crs::wgs84(),
        );
        let cut = cut_by_antimeridian(&v).unwrap();
        assert_eq!(cut, v);
    }

    #[test]
    fn test_point_is_unchanged() {
        let v = GeoVector::new(Point::new(179.5, 0.0).into(), Crs::wgs84());
        assert_eq!(cut_by_antimeridian(&v).unwrap(), v);
    }

    #[test]
    fn test_square_across_180_geographic() {
        let v = GeoVector::new(
            polygon(vec![(170.0, 10.0), (190.0, 10.0), (190.0, 20.0), (170.0, 20.0)]).into(),
            Crs::wgs84(),
        );

        let cut = cut_by_antimeridian(&v).unwrap();
        assert_eq!(*cut.crs(), Crs::wgs84());

        let parts = pieces(&cut);
        assert_eq!(parts.len(), 2);
        assert_bounds(&parts[0], (170.0, 10.0, 180.0, 20.0), 1e-6);
        assert_bounds(&parts[1], (-180.0, 10.0, -170.0, 20.0), 1e-6);

        // Undoing the offset gives back the east side of the original square
        let restored = offset_shape(&parts[1], -GEOGRAPHIC_WIDTH, 0.0).unwrap();
        assert_bounds(&restored, (180.0, 10.0, 190.0, 20.0), 1e-6);
    }

    #[test]
    fn test_explicit_offset() {
        let v = GeoVector::new(
            polygon(vec![(170.0, 10.0), (190.0, 10.0), (190.0, 20.0), (170.0, 20.0)]).into(),
            Crs::wgs84(),
        );
        let cut = cut_by_antimeridian_with_offset(&v, 100.0).unwrap();
        assert_bounds(&pieces(&cut)[1], (80.0, 10.0, 90.0, 20.0), 1e-6);
    }

    #[test]
    fn test_square_across_180_web_mercator() {
        let square = polygon(vec![(170.0, -10.0), (190.0, -10.0), (190.0, 10.0), (170.0, 10.0)]);
        // Build in mercator meters directly; longitude 190 is past the
        // projection's range so it can't come from reprojection.
        let merc = square.map_coords(|c| geo::coord! {
            x: c.x.to_radians() * crate::crs::MERCATOR_RADIUS,
            y: c.y * 100_000.0
        });
        let v = GeoVector::new(merc.into(), Crs::web_mercator());

        let cut = cut_by_antimeridian(&v).unwrap();
        let parts = pieces(&cut);
        assert_eq!(parts.len(), 2);

        let half = MERCATOR_WIDTH / 2.0;
        let ten_deg = MERCATOR_WIDTH / 36.0;
        assert_bounds(&parts[0], (half - ten_deg, -1e6, half, 1e6), 1.0);
        assert_bounds(&parts[1], (-half, -1e6, -half + ten_deg, 1e6), 1.0);

        let restored = offset_shape(&parts[1], -MERCATOR_WIDTH, 0.0).unwrap();
        assert_bounds(&restored, (half, -1e6, half + ten_deg, 1e6), 1.0);
    }

    #[test]
    fn test_square_across_180_off_greenwich_mercator() {
        let crs: Crs = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=90 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"
            .parse()
            .unwrap();
        let square = polygon(vec![(170.0, -10.0), (190.0, -10.0), (190.0, 10.0), (170.0, 10.0)]);
        let merc = square.map_coords(|c| geo::coord! {
            x: (c.x - 90.0).to_radians() * crate::crs::MERCATOR_RADIUS,
            y: c.y * 100_000.0
        });
        let v = GeoVector::new(merc.into(), crs.clone());

        let cut = cut_by_antimeridian(&v).unwrap();
        assert_eq!(*cut.crs(), crs);
        let parts = pieces(&cut);
        assert_eq!(parts.len(), 2);

        // The antimeridian sits a quarter turn east of the central meridian
        let quarter = MERCATOR_WIDTH / 4.0;
        let ten_deg = MERCATOR_WIDTH / 36.0;
        assert_bounds(&parts[0], (quarter - ten_deg, -1e6, quarter, 1e6), 1.0);
        assert_bounds(
            &parts[1],
            (quarter - MERCATOR_WIDTH, -1e6, quarter + ten_deg - MERCATOR_WIDTH, 1e6),
            1.0,
        );
    }

    #[test]
    fn test_square_across_180_epsg() {
        let v = GeoVector::new(
            polygon(vec![(170.0, 10.0), (190.0, 10.0), (190.0, 20.0), (170.0, 20.0)]).into(),
            Crs::from_epsg(4326),
        );
        let cut = cut_by_antimeridian(&v).unwrap();
        assert_eq!(cut.crs().epsg(), Some(4326));
        assert_bounds(&pieces(&cut)[1], (-180.0, 10.0, -170.0, 20.0), 1e-6);

        let square = polygon(vec![(170.0, -10.0), (190.0, -10.0), (190.0, 10.0), (170.0, 10.0)]);
        let merc = square.map_coords(|c| geo::coord! {
            x: c.x.to_radians() * crate::crs::MERCATOR_RADIUS,
            y: c.y * 100_000.0
        });
        let v = GeoVector::new(merc.into(), Crs::from_epsg(3857));
        let cut = cut_by_antimeridian(&v).unwrap();

        let half = MERCATOR_WIDTH / 2.0;
        let ten_deg = MERCATOR_WIDTH / 36.0;
        assert_bounds(&pieces(&cut)[1], (-half, -1e6, -half + ten_deg, 1e6), 1.0);
    }

    #[test]
    fn test_multiple_crossings_rejected() {
        // Opens to the west: two bars west of 180°, joined east of it
        let v = GeoVector::new(
            polygon(vec![
                (170.0, 0.0),
                (190.0, 0.0),
                (190.0, 30.0),
                (170.0, 30.0),
                (170.0, 25.0),
                (185.0, 25.0),
                (185.0, 5.0),
                (170.0, 5.0),
            ])
            .into(),
            Crs::wgs84(),
        );
        assert_eq!(
            cut_by_antimeridian(&v),
            Err(GeoError::UnsupportedTopology { pieces: 3 })
        );
    }

    #[test]
    fn test_crossing_line_cannot_be_offset() {
        let v = GeoVector::new(
            LineString::from(vec![(170.0, 0.0), (190.0, 0.0)]).into(),
            Crs::wgs84(),
        );
        assert!(matches!(
            cut_by_antimeridian(&v),
            Err(GeoError::Unsupported(_))
        ));
    }

    #[test]
    fn test_empty_geometry() {
        let v = GeoVector::new(geo::MultiPolygon::<f64>::new(vec![]).into(), Crs::wgs84());
        assert!(matches!(
            cut_by_antimeridian(&v),
            Err(GeoError::InvalidGeometry(_))
        ));
    }
}
