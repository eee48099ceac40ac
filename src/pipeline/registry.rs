// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Pipeline registry
//!
//! Definitions register themselves explicitly; nothing is discovered by
//! scanning loaded code.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{AdflowError, AdflowResult};
use crate::pipeline::Pipeline;

/// Named collection of pipelines, iterated in name order
#[derive(Debug, Clone, Default)]
pub struct PipelineRegistry {
    pipelines: BTreeMap<String, Arc<Pipeline>>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pipeline, rejecting a second pipeline with the same name
    pub fn register(&mut self, pipeline: Pipeline) -> AdflowResult<Arc<Pipeline>> {
        if self.pipelines.contains_key(pipeline.name()) {
            return Err(AdflowError::DuplicatePipeline {
                name: pipeline.name().to_string(),
            });
        }

        let pipeline = Arc::new(pipeline);
        self.pipelines
            .insert(pipeline.name().to_string(), Arc::clone(&pipeline));
        Ok(pipeline)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Pipeline>> {
        self.pipelines.get(name)
    }

    /// Look up a pipeline, failing if it is not registered
    pub fn require(&self, name: &str) -> AdflowResult<&Arc<Pipeline>> {
        self.get(name).ok_or_else(|| AdflowError::PipelineNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Pipeline>> {
        self.pipelines.values()
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = PipelineRegistry::new();
        let ingest = registry.register(Pipeline::new("ingest")).unwrap();

        assert_eq!(ingest.name(), "ingest");
        assert!(registry.contains("ingest"));
        assert!(Arc::ptr_eq(registry.get("ingest").unwrap(), &ingest));
        assert!(matches!(
            registry.require("missing"),
            Err(AdflowError::PipelineNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = PipelineRegistry::new();
        registry.register(Pipeline::new("ingest")).unwrap();

        let err = registry.register(Pipeline::new("ingest")).unwrap_err();
        assert!(matches!(err, AdflowError::DuplicatePipeline { name } if name == "ingest"));
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut registry = PipelineRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(Pipeline::new(name)).unwrap();
        }
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
    }
}
