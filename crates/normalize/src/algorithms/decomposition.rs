use geo_types::{Geometry, Polygon};
use crate::error::{NormalizeError, Result};

/// Split a repaired geometry into independent polygons.
///
/// MultiPolygon members become separate polygons, a Polygon passes through,
/// and anything else is unsupported.
pub fn decompose(geometry: Geometry<f64>) -> Result<Vec<Polygon<f64>>> {
    let kind = geometry_type_name(&geometry);
    let polygons = match geometry {
        Geometry::MultiPolygon(multi) => multi.0,
        Geometry::Polygon(polygon) => vec![polygon],
        _ => Vec::new(),
    };

    if polygons.is_empty() {
        return Err(NormalizeError::UnsupportedGeometry(kind.to_string()));
    }
    Ok(polygons)
}

/// GeoJSON type name of a geometry
pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
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
