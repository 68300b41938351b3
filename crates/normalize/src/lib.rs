//! # GeoJSON Polygon Normalization Library
//!
//! Turns an arbitrary GeoJSON geometry or feature into a list of simple,
//! closed, duplicate-free polygon features that an interactive drawing tool
//! accepts without complaint.
//!
//! ## Pipeline
//!
//! 1. **Extraction**: unwrap a Feature to its geometry
//! 2. **Winding**: orient rings with reversed (clockwise exterior) winding
//! 3. **Repair**: zero-distance buffer to collapse invalid topology
//! 4. **Decomposition**: split MultiPolygons into Polygons
//! 5. **Ring cleanup**: dedup, close, round, dedup again, close again
//! 6. **Assembly**: one feature per surviving ring, tagged `mode: "polygon"`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use normalize::{normalize, NormalizeOptions};
//!
//! let input: geojson::GeoJson =
//!     r#"{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10]]]}"#.parse()?;
//! let features = normalize(&input, &NormalizeOptions::default())?;
//! assert_eq!(features.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use normalize::{Pipeline, SequentialIdProvider};
//!
//! let pipeline = Pipeline::builder()
//!     .with_precision(4)
//!     .set_id_provider(SequentialIdProvider::new())
//!     .without_repair()
//!     .build();
//! let features = pipeline.import_geojson_file("area.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod typed_geojson;

// Re-exports for convenience
pub use error::{NormalizeError, Result};
pub use types::{DrawMode, NormalizeOptions, NormalizedFeature, Ring};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::{
    export_features, export_geojson, select_normalizable, GeoJsonDownload,
    DEFAULT_EXPORT_FILENAME, GEOJSON_MIME_TYPE,
};
pub use typed_geojson::{to_feature_collection, DrawFeature, TypedFeature};

/// Normalize a geometry or feature with the default repairer and random ids
pub fn normalize(input: &::geojson::GeoJson, options: &NormalizeOptions) -> Result<Vec<NormalizedFeature>> {
    Pipeline::builder()
        .with_options(*options)
        .build()
        .normalize(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ::geojson::GeoJson {
        json.parse().expect("Should parse test GeoJSON")
    }

    #[test]
    fn test_normalize_square() {
        let input = parse(r#"{"type":"Polygon","coordinates":[[[0,0],[0,0],[10,0],[10,10],[0,10],[0,0]]]}"#);

        let features = normalize(&input, &NormalizeOptions::default()).expect("Should normalize");
        assert_eq!(features.len(), 1);

        let ring = features[0].ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!(ring.windows(2).all(|w| w[0] != w[1]));
        for corner in [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]] {
            assert!(ring.contains(&corner));
        }
        assert!(is_uuid_v4_layout(&features[0].id));
    }

    #[test]
    fn test_normalize_closes_open_ring() {
        let input = parse(r#"{"type":"Polygon","coordinates":[[[0,0],[5,0],[5,5],[0,5]]]}"#);

        let features = normalize(&input, &NormalizeOptions::default()).expect("Should normalize");
        let ring = features[0].ring();
        assert_eq!(ring.first(), ring.last());
        assert!(ring.contains(&[0.0, 0.0]));
        assert!(ring.contains(&[5.0, 5.0]));
    }

    #[test]
    fn test_normalize_rejects_lines() {
        let input = parse(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#);

        let err = normalize(&input, &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnsupportedGeometry(_)));
    }

    #[test]
    fn test_wire_shape() {
        let feature = NormalizedFeature::new(
            "00000000-0000-4000-8000-000000000000".to_string(),
            vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]],
        );

        let value = serde_json::to_value(&feature).expect("Should serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "00000000-0000-4000-8000-000000000000",
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "properties": { "mode": "polygon" }
            })
        );

        let back: NormalizedFeature = serde_json::from_value(value).expect("Should deserialize");
        assert_eq!(back, feature);
    }
}
