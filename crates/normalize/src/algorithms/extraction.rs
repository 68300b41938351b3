use geojson::{GeoJson, Geometry};
use crate::error::{NormalizeError, Result};

/// Unwrap a Feature to its geometry, or take a bare geometry as-is.
///
/// The geometry type itself is not checked here.
pub fn extract_geometry(input: &GeoJson) -> Result<Geometry> {
    match input {
        GeoJson::Geometry(geometry) => Ok(geometry.clone()),
        GeoJson::Feature(feature) => feature
            .geometry
            .clone()
            .ok_or_else(|| NormalizeError::UnsupportedGeometry("Feature".to_string())),
        GeoJson::FeatureCollection(_) => {
            Err(NormalizeError::UnsupportedGeometry("FeatureCollection".to_string()))
        }
    }
}
