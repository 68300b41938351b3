use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value};

use crate::types::{DrawProperties, NormalizedFeature};

/// A GeoJSON Feature that is generic over its properties.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TypedFeature<P> {
    #[serde(flatten)]
    pub feature: Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

/// Feature carrying the drawing-tool properties
pub type DrawFeature = TypedFeature<DrawProperties>;

impl<P> TypedFeature<P>
where
    for<'de> P: Serialize + Deserialize<'de>,
{
    pub fn new(id: Option<String>, geometry: Option<Geometry>, properties: P) -> Self {
        let feature = Feature {
            bbox: None,
            geometry,
            id: id.map(Id::String),
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Tries to access the typed properties of the feature.
    pub fn properties(&self) -> Option<P> {
        self.feature.properties.as_ref().and_then(|p| {
            serde_json::from_value(serde_json::Value::Object(p.clone())).ok()
        })
    }

    pub fn into_inner(self) -> Feature {
        self.feature
    }
}

impl From<&NormalizedFeature> for DrawFeature {
    fn from(normalized: &NormalizedFeature) -> Self {
        let rings = normalized
            .geometry
            .coordinates
            .iter()
            .map(|ring| ring.iter().map(|&[x, y]| vec![x, y]).collect())
            .collect();

        TypedFeature::new(
            Some(normalized.id.clone()),
            Some(Geometry::new(Value::Polygon(rings))),
            normalized.properties.clone(),
        )
    }
}

impl NormalizedFeature {
    /// Convert into a plain `geojson::Feature`
    pub fn to_geojson_feature(&self) -> Feature {
        DrawFeature::from(self).into_inner()
    }
}

/// Wrap normalized features into a FeatureCollection
pub fn to_feature_collection(features: &[NormalizedFeature]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.iter().map(NormalizedFeature::to_geojson_feature).collect(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawMode;

    fn sample() -> NormalizedFeature {
        NormalizedFeature::new(
            "00000000-0000-4000-8000-000000000000".to_string(),
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
        )
    }

    #[test]
    fn test_typed_properties_roundtrip() {
        let feature = DrawFeature::from(&sample());
        let props = feature.properties().expect("Should read properties");
        assert_eq!(props.mode, DrawMode::Polygon);
        assert_eq!(
            feature.feature.id,
            Some(Id::String("00000000-0000-4000-8000-000000000000".to_string()))
        );
    }

    #[test]
    fn test_collection_keeps_geometry() {
        let collection = to_feature_collection(&[sample(), sample()]);
        assert_eq!(collection.features.len(), 2);

        let geometry = collection.features[0].geometry.as_ref().expect("Should carry geometry");
        let Value::Polygon(rings) = &geometry.value else {
            panic!("Should be a polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0][1], vec![1.0, 0.0]);
    }
}
