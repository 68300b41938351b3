//! # Postpass Query Construction
//!
//! Builds SQL queries against the Postpass OSM database that select buildings,
//! roads and water features intersecting a polygon, and dispatches them over
//! HTTP.

pub mod client;

use geojson::{Geometry, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, IntoEnumIterator};
use thiserror::Error;

pub use client::{PostpassClient, DEFAULT_ENDPOINT};

#[derive(Error, Debug)]
pub enum PostpassError {
    #[error("Query configuration error: {0}")]
    QueryConfig(String),
    #[error("Postpass query failed: {status} {reason}")]
    Network { status: u16, reason: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PostpassError>;

/// SRID of the WKT literal embedded in queries
const WGS84_SRID: u32 = 4326;

/// OSM feature families that can be extracted
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractLayer {
    Building,
    Road,
    Water,
}

impl ExtractLayer {
    /// Postpass table holding the features
    pub fn table(&self) -> &'static str {
        match self {
            Self::Building | Self::Water => "postpass_polygon",
            Self::Road => "postpass_line",
        }
    }

    /// Tag filter selecting the features
    pub fn tag_predicate(&self) -> &'static str {
        match self {
            Self::Building => "tags ? 'building'",
            Self::Road => "tags ? 'highway'",
            Self::Water => "(tags ? 'water' OR tags ? 'waterway')",
        }
    }

    /// Tag whose value is reported as the feature subtype
    pub fn subtype_tag(&self) -> &'static str {
        match self {
            Self::Building => "building",
            Self::Road => "highway",
            Self::Water => "waterway",
        }
    }

    fn clause(&self, wkt: &str) -> String {
        format!(
            "SELECT\n  '{layer}' AS layer,\n  tags->>'name' AS name,\n  tags->>'{subtype}' AS subtype,\n  geom\n\
             FROM {table}\n\
             WHERE\n  {predicate}\n  AND ST_Intersects(\n    geom,\n    ST_GeomFromText('{wkt}', {srid})\n  )",
            layer = self,
            subtype = self.subtype_tag(),
            table = self.table(),
            predicate = self.tag_predicate(),
            srid = WGS84_SRID,
        )
    }
}

/// Which layers to extract
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractTypes {
    pub buildings: bool,
    pub roads: bool,
    pub water: bool,
}

impl ExtractTypes {
    pub fn all() -> Self {
        Self {
            buildings: true,
            roads: true,
            water: true,
        }
    }

    /// Selected layers in query order
    pub fn layers(&self) -> Vec<ExtractLayer> {
        ExtractLayer::iter()
            .filter(|layer| match layer {
                ExtractLayer::Building => self.buildings,
                ExtractLayer::Road => self.roads,
                ExtractLayer::Water => self.water,
            })
            .collect()
    }
}

/// Build a `UNION ALL` query selecting every requested layer within `geometry`
pub fn extract_within_geometry_query(geometry: &Geometry, types: &ExtractTypes) -> Result<String> {
    let wkt = geometry_to_wkt(geometry)?;
    let clauses: Vec<String> = types.layers().iter().map(|layer| layer.clause(&wkt)).collect();

    if clauses.is_empty() {
        return Err(PostpassError::QueryConfig("No extract types selected".to_string()));
    }

    Ok(clauses.join("\nUNION ALL\n"))
}

/// Convert a Polygon or MultiPolygon to WKT using exterior rings only
pub fn geometry_to_wkt(geometry: &Geometry) -> Result<String> {
    match &geometry.value {
        Value::Polygon(rings) => Ok(format!("POLYGON({})", exterior_wkt(rings)?)),
        Value::MultiPolygon(polygons) => {
            let members = polygons
                .iter()
                .map(|rings| exterior_wkt(rings))
                .collect::<Result<Vec<_>>>()?;
            Ok(format!("MULTIPOLYGON({})", members.join(", ")))
        }
        other => Err(PostpassError::QueryConfig(format!(
            "Unsupported geometry type: {}",
            value_type_name(other)
        ))),
    }
}

fn exterior_wkt(rings: &[Vec<Vec<f64>>]) -> Result<String> {
    let exterior = rings
        .first()
        .ok_or_else(|| PostpassError::QueryConfig("Polygon has no exterior ring".to_string()))?;

    let positions = exterior
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok(format!("{lon} {lat}")),
            _ => Err(PostpassError::QueryConfig("Position needs two coordinates".to_string())),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(format!("(({}))", positions.join(", ")))
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
