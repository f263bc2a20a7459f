//! Ordered pipeline registry.
//!
//! Registration order is fixed at setup time and is the execution order
//! for every walk, full or incremental.

use crate::engine::pipeline::Pipeline;
use thiserror::Error;

/// Error raised synchronously at pipeline setup.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// `pick` was called with an empty pattern
    #[error("a non-empty glob pattern is required to pick up files")]
    EmptyPattern,
    /// The pattern did not parse as a glob
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Ordered list of registered pipelines plus the active rest index.
#[derive(Debug, Default)]
pub struct PipelineRegistry {
    pipelines: Vec<Pipeline>,
    rest_index: Option<usize>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pipeline. Registering a rest pipeline moves the active
    /// rest designation here, silently overwriting any earlier one.
    pub fn register(&mut self, pipeline: Pipeline) {
        if pipeline.is_rest() {
            self.rest_index = Some(self.pipelines.len());
        }
        self.pipelines.push(pipeline);
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Index of the active rest pipeline, if one is designated.
    pub fn rest_index(&self) -> Option<usize> {
        self.rest_index
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pipeline> {
        self.pipelines.iter_mut()
    }

    /// The active rest pipeline, if any.
    pub fn rest_pipeline_mut(&mut self) -> Option<&mut Pipeline> {
        self.rest_index.map(move |i| &mut self.pipelines[i])
    }

    pub fn get(&self, index: usize) -> Option<&Pipeline> {
        self.pipelines.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterned(pattern: &str) -> Pipeline {
        Pipeline::patterned(pattern, glob::Pattern::new(pattern).unwrap())
    }

    #[test]
    fn test_registration_preserves_order() {
        let mut registry = PipelineRegistry::new();
        registry.register(patterned("*.js"));
        registry.register(patterned("*.css"));
        registry.register(Pipeline::rest("rest"));

        let tags: Vec<_> = registry.iter().map(|p| p.tag().to_string()).collect();
        assert_eq!(tags, vec!["*.js", "*.css", "rest"]);
    }

    #[test]
    fn test_rest_index_tracks_rest_pipeline() {
        let mut registry = PipelineRegistry::new();
        registry.register(patterned("*.js"));
        assert_eq!(registry.rest_index(), None);

        registry.register(Pipeline::rest("rest"));
        assert_eq!(registry.rest_index(), Some(1));
    }

    #[test]
    fn test_later_rest_registration_wins() {
        let mut registry = PipelineRegistry::new();
        registry.register(Pipeline::rest("first"));
        registry.register(patterned("*.js"));
        registry.register(Pipeline::rest("second"));

        assert_eq!(registry.rest_index(), Some(2));
        assert_eq!(registry.rest_pipeline_mut().unwrap().tag(), "second");
        // Both rest pipelines stay registered and keep their walk slots.
        assert_eq!(registry.len(), 3);
    }
}
