// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Pipeline validation
//!
//! Collects every problem a pipeline would hit on emission, instead of
//! stopping at the first one.

use std::collections::HashSet;

use crate::activity::Activity;
use crate::errors::AdflowError;
use crate::pipeline::{DagBuilder, Pipeline};

/// Pipeline validator
pub struct PipelineValidator;

impl PipelineValidator {
    /// Validate a pipeline definition
    pub fn validate(pipeline: &Pipeline) -> ValidationResult {
        let mut result = ValidationResult::new();

        if pipeline.activities().is_empty() {
            result.add_warning("Pipeline has no activities defined");
        }

        // Names are unique across the whole pipeline, nested children included
        let mut seen_names = HashSet::new();
        for activity in pipeline.activities().iter().flat_map(Activity::walk) {
            if !seen_names.insert(activity.name()) {
                result.add_error(&format!("Duplicate activity name: '{}'", activity.name()));
            }
        }

        Self::validate_scope(pipeline.activities(), "top level", &mut result);

        if let Some(trigger) = pipeline.trigger() {
            if let Err(e) = trigger.recurrence() {
                result.add_error(&format!("Schedule '{}': {}", trigger.schedule, e));
            }
        }

        result
    }

    /// Validate one dependency scope and then each nested scope
    fn validate_scope(activities: &[Activity], scope: &str, result: &mut ValidationResult) {
        match DagBuilder::build(activities) {
            Ok(_) => {}
            Err(AdflowError::CircularDependency { members }) => {
                result.add_error(&format!(
                    "Circular dependency in {}: {}",
                    scope,
                    members.join(" → ")
                ));
            }
            Err(AdflowError::DanglingDependency { activity, dependency }) => {
                result.add_error(&format!(
                    "Activity '{}' depends on unknown activity '{}' in {}",
                    activity, dependency, scope
                ));
            }
            // Already reported as a duplicate activity name
            Err(AdflowError::DuplicateNode { .. }) => {}
            Err(e) => {
                result.add_error(&format!("DAG validation error in {}: {}", scope, e));
            }
        }

        for activity in activities {
            for child_scope in activity.child_scopes() {
                let label = format!("'{}'", activity.name());
                Self::validate_scope(child_scope, &label, result);
            }
        }
    }
}

/// Result of pipeline validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
