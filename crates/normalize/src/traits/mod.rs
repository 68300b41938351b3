use geo_types::Geometry;
use crate::error::Result;

/// Trait for topology repair algorithms
pub trait GeometryRepairer: Send + Sync {
    /// Repair the geometry into valid simple polygons.
    ///
    /// `Ok(None)` means the repair produced no geometry at all, and the
    /// pipeline aborts with `GeometryRepair`. With `BufferRepairer` this is
    /// what happens to input with zero area, so `EmptyResult` is only
    /// reached when polygons survive repair but collapse during ring
    /// cleanup (for example under rounding).
    fn repair(&self, geometry: Geometry<f64>) -> Result<Option<Geometry<f64>>>;
}

/// Trait for feature identifier generation
pub trait IdProvider: Send + Sync {
    /// Produce the next identifier
    fn next_id(&self) -> String;
}
