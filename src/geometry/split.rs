//! Splitting shapes by a dividing line

use geo::{
    Area, BooleanOps, BoundingRect, Coord, Geometry, LineString, MultiLineString, MultiPolygon,
    Polygon, Rect, coord,
};

use super::kind;
use crate::error::{GeoError, Result};

/// Split a shape by a line running roughly south to north.
///
/// The line is extended vertically past the shape and closed around its far
/// west side; pieces are the parts of the shape inside that region followed
/// by the parts outside it, sorted by minimum x. An empty shape yields no
/// pieces and points are never split.
pub fn split_by_line(shape: &Geometry<f64>, line: &LineString<f64>) -> Result<Vec<Geometry<f64>>> {
    if line.0.len() < 2 {
        return Err(GeoError::InvalidGeometry(
            "split line needs at least two points".to_string(),
        ));
    }

    let Some(bounds) = shape.bounding_rect() else {
        return Ok(Vec::new());
    };

    let mut pieces = match shape {
        Geometry::Point(_) | Geometry::MultiPoint(_) => vec![shape.clone()],
        Geometry::Polygon(p) => split_polygons(&MultiPolygon::new(vec![p.clone()]), line, bounds),
        Geometry::MultiPolygon(mp) => split_polygons(mp, line, bounds),
        Geometry::Rect(r) => split_polygons(&MultiPolygon::new(vec![r.to_polygon()]), line, bounds),
        Geometry::Triangle(t) => {
            split_polygons(&MultiPolygon::new(vec![t.to_polygon()]), line, bounds)
        }
        Geometry::Line(l) => split_lines(
            &MultiLineString::new(vec![LineString::new(vec![l.start, l.end])]),
            line,
            bounds,
        ),
        Geometry::LineString(l) => split_lines(&MultiLineString::new(vec![l.clone()]), line, bounds),
        Geometry::MultiLineString(ml) => split_lines(ml, line, bounds),
        Geometry::GeometryCollection(_) => {
            return Err(GeoError::Unsupported(format!(
                "splitting a {}",
                kind(shape)
            )));
        }
    };

    pieces.sort_by(|a, b| min_x(a).total_cmp(&min_x(b)));
    Ok(pieces)
}

fn split_polygons(
    polygons: &MultiPolygon<f64>,
    line: &LineString<f64>,
    bounds: Rect<f64>,
) -> Vec<Geometry<f64>> {
    let region = MultiPolygon::new(vec![west_region(line, bounds)]);
    let west = polygons.intersection(&region);
    let east = polygons.difference(&region);

    west.0
        .into_iter()
        .chain(east.0)
        .filter(|p| p.unsigned_area() > 0.0)
        .map(Geometry::Polygon)
        .collect()
}

fn split_lines(
    lines: &MultiLineString<f64>,
    line: &LineString<f64>,
    bounds: Rect<f64>,
) -> Vec<Geometry<f64>> {
    let region = MultiPolygon::new(vec![west_region(line, bounds)]);
    let west = region.clip(lines, false);
    let east = region.clip(lines, true);

    west.0
        .into_iter()
        .chain(east.0)
        .filter(|l| l.0.len() >= 2)
        .map(Geometry::LineString)
        .collect()
}

/// Region west of `line`, large enough to cover everything in `bounds` that
/// lies on that side.
fn west_region(line: &LineString<f64>, bounds: Rect<f64>) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = line.0.clone();
    if coords[0].y > coords[coords.len() - 1].y {
        coords.reverse();
    }

    let (mut min_x, mut min_y, mut max_y) = (bounds.min().x, bounds.min().y, bounds.max().y);
    for c in &coords {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_y = max_y.max(c.y);
    }

    let margin = bounds.width().max(bounds.height()).max(1.0);
    let bottom = min_y - margin;
    let top = max_y + margin;
    let west = min_x - margin;

    let first = coords[0];
    let last = coords[coords.len() - 1];

    let mut ring = Vec::with_capacity(coords.len() + 4);
    ring.push(coord! { x: first.x, y: bottom });
    ring.extend(coords);
    ring.push(coord! { x: last.x, y: top });
    ring.push(coord! { x: west, y: top });
    ring.push(coord! { x: west, y: bottom });

    Polygon::new(LineString::new(ring), vec![])
}

fn min_x(shape: &Geometry<f64>) -> f64 {
    shape
        .bounding_rect()
        .map(|r| r.min().x)
        .unwrap_or(f64::INFINITY)
}
