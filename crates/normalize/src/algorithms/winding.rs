use geo::algorithm::orient::{Direction, Orient};
use geo_types::{Geometry, GeometryCollection};

/// Orient every polygon with reversed winding: clockwise exteriors,
/// counter-clockwise holes.
pub fn rewind(geometry: Geometry<f64>) -> Geometry<f64> {
    match geometry {
        Geometry::Polygon(polygon) => Geometry::Polygon(polygon.orient(Direction::Reversed)),
        Geometry::MultiPolygon(multi) => Geometry::MultiPolygon(multi.orient(Direction::Reversed)),
        Geometry::GeometryCollection(collection) => Geometry::GeometryCollection(
            GeometryCollection::new_from(collection.into_iter().map(rewind).collect()),
        ),
        other => other,
    }
}
