// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Graph command - visualize dependencies as a graph

use miette::Result;
use std::path::PathBuf;

use super::GraphFormat;
use crate::pipeline::DagBuilder;

/// Run the graph command
pub async fn run(
    path: PathBuf,
    pipeline: Option<String>,
    format: GraphFormat,
    _verbose: bool,
) -> Result<()> {
    let registry = super::load_registry(&path)?;

    // Activities of one pipeline, or how the pipelines depend on each other
    let (dag, title) = match &pipeline {
        Some(name) => {
            let pipeline = registry.require(name)?;
            (DagBuilder::build(pipeline.activities())?, name.clone())
        }
        None => (DagBuilder::for_registry(&registry)?, "pipelines".to_string()),
    };

    let output = match format {
        GraphFormat::Text => dag.to_text()?,
        GraphFormat::Dot => dag.to_dot(&title),
        GraphFormat::Mermaid => dag.to_mermaid(),
    };

    println!("{}", output);

    Ok(())
}
