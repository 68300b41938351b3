pub mod builder;

use geojson::GeoJson;
use geo_types::Geometry;
use tracing::{debug, info};

use crate::{
    algorithms::{decompose, extract_geometry, geometry_type_name, RingNormalizer},
    error::{NormalizeError, Result},
    traits::{GeometryRepairer, IdProvider},
    types::NormalizedFeature,
};

/// The normalization pipeline: extraction, repair, decomposition,
/// ring cleanup and feature assembly, in that order.
pub struct Pipeline {
    repairer: Box<dyn GeometryRepairer>,
    id_provider: Box<dyn IdProvider>,
    ring_normalizer: RingNormalizer,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        repairer: Box<dyn GeometryRepairer>,
        id_provider: Box<dyn IdProvider>,
        ring_normalizer: RingNormalizer,
    ) -> Self {
        Self {
            repairer,
            id_provider,
            ring_normalizer,
        }
    }

    /// Normalize a geometry or feature into drawing-tool-ready features
    pub fn normalize(&self, input: &GeoJson) -> Result<Vec<NormalizedFeature>> {
        // Step 1: Extract the bare geometry
        let geometry = extract_geometry(input)?;
        let geometry = Geometry::<f64>::try_from(geometry)?;
        let input_type = geometry_type_name(&geometry);

        // Step 2: Fix winding and topology
        let repaired = self
            .repairer
            .repair(geometry)?
            .ok_or(NormalizeError::GeometryRepair)?;

        // Step 3: Split into polygons
        let polygons = decompose(repaired)?;
        let candidates = polygons.len();

        // Step 4: Clean up each exterior ring, skipping degenerate ones
        let features: Vec<NormalizedFeature> = polygons
            .iter()
            .enumerate()
            .filter_map(|(index, polygon)| {
                let ring = self.ring_normalizer.normalize_exterior(polygon);
                if ring.is_none() {
                    debug!("Skipping polygon {} of {}: too few distinct points", index + 1, candidates);
                }
                ring
            })
            // Step 5: Assemble features
            .map(|ring| NormalizedFeature::new(self.id_provider.next_id(), ring))
            .collect();

        if features.is_empty() {
            return Err(NormalizeError::EmptyResult);
        }

        info!(
            "Normalized {} into {} of {} polygon(s)",
            input_type,
            features.len(),
            candidates
        );
        Ok(features)
    }

    /// The ring normalizer settings used by this pipeline
    pub fn ring_normalizer(&self) -> &RingNormalizer {
        &self.ring_normalizer
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: precision {}, tolerance {:e}",
            self.ring_normalizer.precision, self.ring_normalizer.tolerance
        )
    }
}
