use normalize::{NormalizeOptions, NormalizedFeature, DEFAULT_EXPORT_FILENAME};
use postpass::{ExtractTypes, DEFAULT_ENDPOINT};

use geojson::{Geometry, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum GeonormError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}


/// Settings shared by all subcommands; command-line flags take precedence
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct GeonormConfig {
    /// Decimal digits kept on each coordinate component
    pub precision: u32,
    /// Absolute tolerance for the pre-rounding duplicate and closure checks
    pub tolerance: f64,
    /// Postpass interpreter endpoint
    pub endpoint: String,
    /// Layers to extract when building queries
    pub extract: ExtractTypes,
    /// Filename used for exported documents
    pub output_filename: String,
}

impl Default for GeonormConfig {
    fn default() -> Self {
        let options = NormalizeOptions::default();
        Self {
            precision: options.precision,
            tolerance: options.tolerance,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            extract: ExtractTypes::default(),
            output_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl GeonormConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, GeonormError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, GeonormError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GeonormError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, GeonormError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeonormError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(GeonormError::UnsupportedFileFormat),
        }
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, GeonormError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert configuration to JSON string
    pub fn to_json(&self) -> Result<String, GeonormError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Get the JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(GeonormConfig)
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            precision: self.precision,
            tolerance: self.tolerance,
        }
    }
}

/// Geometry covering all normalized features: a Polygon for one feature,
/// a MultiPolygon for several.
pub fn features_to_geometry(features: &[NormalizedFeature]) -> Option<Geometry> {
    let mut polygons: Vec<Vec<Vec<Vec<f64>>>> = features
        .iter()
        .map(|feature| {
            feature
                .geometry
                .coordinates
                .iter()
                .map(|ring| ring.iter().map(|&[x, y]| vec![x, y]).collect())
                .collect()
        })
        .collect();

    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(|rings| Geometry::new(Value::Polygon(rings))),
        _ => Some(Geometry::new(Value::MultiPolygon(polygons))),
    }
}
