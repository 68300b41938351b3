use crate::{
    pipeline::Pipeline,
    traits::{GeometryRepairer, IdProvider},
    types::NormalizeOptions,
    algorithms::{
        BufferRepairer,
        NoopRepairer,
        RingNormalizer,
        UuidV4Provider,
    },
};

/// Builder for creating normalization pipelines with a fluent API
pub struct PipelineBuilder {
    repairer: Option<Box<dyn GeometryRepairer>>,
    id_provider: Option<Box<dyn IdProvider>>,
    options: NormalizeOptions,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            repairer: None,
            id_provider: None,
            options: NormalizeOptions::default(),
        }
    }

    /// Set the geometry repairer (replaces any existing one)
    pub fn set_repairer<R>(mut self, repairer: R) -> Self
    where
        R: GeometryRepairer + 'static,
    {
        self.repairer = Some(Box::new(repairer));
        self
    }

    /// Set the identifier provider (replaces any existing one)
    pub fn set_id_provider<I>(mut self, provider: I) -> Self
    where
        I: IdProvider + 'static,
    {
        self.id_provider = Some(Box::new(provider));
        self
    }

    /// Only correct winding, skip the zero-buffer topology repair
    pub fn without_repair(self) -> Self {
        self.set_repairer(NoopRepairer)
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.options.precision = precision;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.options.tolerance = tolerance;
        self
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let repairer = self.repairer
            .unwrap_or_else(|| Box::new(BufferRepairer));

        let id_provider = self.id_provider
            .unwrap_or_else(|| Box::new(UuidV4Provider));

        Pipeline::new(
            repairer,
            id_provider,
            RingNormalizer::new(self.options.precision, self.options.tolerance),
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pipeline = PipelineBuilder::new().build();
        assert_eq!(*pipeline.ring_normalizer(), RingNormalizer::default());
    }

    #[test]
    fn test_options_are_applied() {
        let pipeline = PipelineBuilder::new()
            .with_precision(3)
            .with_tolerance(1e-4)
            .build();
        assert_eq!(*pipeline.ring_normalizer(), RingNormalizer::new(3, 1e-4));

        let pipeline = PipelineBuilder::new()
            .with_options(NormalizeOptions { precision: 2, tolerance: 0.5 })
            .build();
        assert_eq!(pipeline.info(), "Pipeline: precision 2, tolerance 5e-1");
    }
}
