use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use geojson::GeoJson;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::{
    error::{NormalizeError, Result},
    pipeline::Pipeline,
    typed_geojson::to_feature_collection,
    types::NormalizedFeature,
};

/// MIME type of exported documents
pub const GEOJSON_MIME_TYPE: &str = "application/geo+json";

/// Filename used when the caller does not pick one
pub const DEFAULT_EXPORT_FILENAME: &str = "extract.geojson";

/// Pick the part of a GeoJSON document that gets normalized.
///
/// Only the first feature of a FeatureCollection is used.
pub fn select_normalizable(document: JsonValue) -> Result<GeoJson> {
    let JsonValue::Object(mut object) = document else {
        return Err(NormalizeError::Format("document is not a JSON object".to_string()));
    };

    let kind = object
        .get("type")
        .and_then(JsonValue::as_str)
        .map(str::to_owned);

    match kind.as_deref() {
        Some("FeatureCollection") => {
            let mut features = match object.remove("features") {
                Some(JsonValue::Array(features)) if !features.is_empty() => features,
                _ => {
                    return Err(NormalizeError::Format(
                        "FeatureCollection has no features".to_string(),
                    ))
                }
            };
            if features.len() > 1 {
                warn!(
                    "FeatureCollection has {} features; only the first is imported",
                    features.len()
                );
            }
            Ok(GeoJson::from_json_value(features.swap_remove(0))?)
        }
        Some("Feature" | "Polygon" | "MultiPolygon") => {
            Ok(GeoJson::from_json_value(JsonValue::Object(object))?)
        }
        Some(other) => Err(NormalizeError::Format(format!("top-level type `{other}`"))),
        None => Err(NormalizeError::Format("missing top-level `type`".to_string())),
    }
}

impl Pipeline {
    /// Import a GeoJSON document from a string and normalize it
    pub fn import_geojson_str(&self, text: &str) -> Result<Vec<NormalizedFeature>> {
        let document: JsonValue = serde_json::from_str(text)?;
        self.normalize(&select_normalizable(document)?)
    }

    /// Import a GeoJSON document from any reader and normalize it
    pub fn import_geojson_reader<R: Read>(&self, reader: R) -> Result<Vec<NormalizedFeature>> {
        let document: JsonValue = serde_json::from_reader(reader)?;
        self.normalize(&select_normalizable(document)?)
    }

    /// Import a GeoJSON file and normalize it
    pub fn import_geojson_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<NormalizedFeature>> {
        let path = path.as_ref();
        info!("Importing {}", path.display());
        let file = File::open(path)?;
        self.import_geojson_reader(BufReader::new(file))
    }
}

/// A serialized GeoJSON document ready to be handed out as a file
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonDownload {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl GeoJsonDownload {
    /// Write the document into `dir` under its filename
    pub fn save_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Serialize any value as a pretty-printed GeoJSON download
pub fn export_geojson<T>(data: &T, filename: Option<&str>) -> Result<GeoJsonDownload>
where
    T: Serialize + ?Sized,
{
    Ok(GeoJsonDownload {
        filename: filename.unwrap_or(DEFAULT_EXPORT_FILENAME).to_string(),
        mime_type: GEOJSON_MIME_TYPE,
        bytes: serde_json::to_vec_pretty(data)?,
    })
}

/// Export normalized features as a FeatureCollection
pub fn export_features(features: &[NormalizedFeature], filename: Option<&str>) -> Result<GeoJsonDownload> {
    export_geojson(&to_feature_collection(features), filename)
}
