use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Invalid geometry after buffering")]
    GeometryRepair,

    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("No valid polygon geometries found")]
    EmptyResult,

    #[error("Invalid or unsupported GeoJSON format: {0}")]
    Format(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
