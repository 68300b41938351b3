use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, IntoStaticStr};
use geo_types::{Coord, LineString, Polygon};

/// Default number of decimal digits kept on every coordinate component
pub const DEFAULT_PRECISION: u32 = 6;

/// Default absolute tolerance used when comparing coordinates before rounding
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// A ring is an ordered sequence of `[longitude, latitude]` pairs
pub type Ring = Vec<[f64; 2]>;

/// Options accepted by the normalization entry point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Decimal digits kept on each coordinate component
    #[schemars(range(max = 15))]
    pub precision: u32,
    /// Absolute tolerance for the pre-rounding duplicate and closure checks
    pub tolerance: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Drawing mode tag understood by the downstream drawing tool
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DrawMode {
    #[default]
    Polygon,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum FeatureKind {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum PolygonKind {
    #[default]
    Polygon,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DrawProperties {
    pub mode: DrawMode,
}

/// Polygon geometry carrying a single exterior ring
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: PolygonKind,
    pub coordinates: Vec<Ring>,
}

/// A closed, duplicate-free, fixed-precision polygon ready for the drawing tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NormalizedFeature {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub geometry: PolygonGeometry,
    pub properties: DrawProperties,
}

impl NormalizedFeature {
    pub fn new(id: String, ring: Ring) -> Self {
        Self {
            id,
            kind: FeatureKind::Feature,
            geometry: PolygonGeometry {
                kind: PolygonKind::Polygon,
                coordinates: vec![ring],
            },
            properties: DrawProperties::default(),
        }
    }

    /// The exterior ring of the feature
    pub fn ring(&self) -> &[[f64; 2]] {
        self.geometry
            .coordinates
            .first()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Convert to geo-types Polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let exterior: Vec<Coord<f64>> = self
            .ring()
            .iter()
            .map(|&[x, y]| Coord { x, y })
            .collect();

        Polygon::new(LineString::new(exterior), vec![])
    }
}
