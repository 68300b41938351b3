use geo::algorithm::buffer::Buffer;
use geo::BooleanOps;
use geo_types::{Geometry, MultiPolygon, Polygon};
use tracing::debug;

use crate::{error::Result, traits::GeometryRepairer};
use super::winding::rewind;

/// Topology repair by dissolving followed by a zero-distance buffer.
///
/// Rewinds the geometry, unions its polygons so that self-intersections,
/// self-touching rings and overlapping members resolve into simple polygons,
/// then buffers the result by 0. If the buffer comes back empty the
/// dissolved polygons are kept as they are.
#[derive(Debug, Clone, Default)]
pub struct BufferRepairer;

impl GeometryRepairer for BufferRepairer {
    fn repair(&self, geometry: Geometry<f64>) -> Result<Option<Geometry<f64>>> {
        let dissolved = match rewind(geometry) {
            Geometry::Polygon(polygon) => dissolve(vec![polygon]),
            Geometry::MultiPolygon(multi) => dissolve(multi.0),
            // Nothing to repair; decomposition reports the type.
            other => return Ok(Some(other)),
        };

        let buffered = dissolved.buffer(0.0);
        debug!(
            "Dissolve produced {} polygon(s), zero buffer {}",
            dissolved.0.len(),
            buffered.0.len()
        );

        let repaired = if buffered.0.is_empty() { dissolved } else { buffered };
        Ok(into_areal(repaired))
    }
}

/// Winding correction only, without topology repair
#[derive(Debug, Clone, Default)]
pub struct NoopRepairer;

impl GeometryRepairer for NoopRepairer {
    fn repair(&self, geometry: Geometry<f64>) -> Result<Option<Geometry<f64>>> {
        Ok(Some(rewind(geometry)))
    }
}

/// Union polygons one at a time; each union also resolves the added
/// polygon's own self-intersections.
fn dissolve(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    polygons
        .iter()
        .fold(MultiPolygon::new(vec![]), |merged, polygon| merged.union(polygon))
}

fn into_areal(mut repaired: MultiPolygon<f64>) -> Option<Geometry<f64>> {
    match repaired.0.len() {
        0 => None,
        1 => repaired.0.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(repaired)),
    }
}
