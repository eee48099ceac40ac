// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Pipelines and their dependency graphs
//!
//! This module defines the pipeline type, the registry pipelines are
//! collected into, and the graph checks run before emission.

mod dag;
mod definition;
mod registry;
mod validation;

pub use dag::DagBuilder;
pub(crate) use dag::Node;
pub use definition::Pipeline;
pub use registry::PipelineRegistry;
pub use validation::{PipelineValidator, ValidationResult};
