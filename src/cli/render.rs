// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Render command - print native documents

use miette::Result;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::AdflowResult;
use crate::pipeline::Pipeline;

/// Run the render command
pub async fn run(path: PathBuf, pipeline: Option<String>, _verbose: bool) -> Result<()> {
    let registry = super::load_registry(&path)?;

    let selected: Vec<&Arc<Pipeline>> = match &pipeline {
        Some(name) => vec![registry.require(name)?],
        None => registry.iter().collect(),
    };

    let mut documents = Map::new();
    for pipeline in selected {
        documents.insert(pipeline.name().to_string(), render_pipeline(pipeline)?);
    }

    let output = serde_json::to_string_pretty(&Value::Object(documents))
        .map_err(|e| miette::miette!("Failed to serialize JSON: {}", e))?;
    println!("{}", output);

    Ok(())
}

/// The pipeline document plus its trigger, keyed by trigger name
fn render_pipeline(pipeline: &Pipeline) -> AdflowResult<Value> {
    let resource = serde_json::to_value(pipeline.to_resource()?)?;

    let trigger = match pipeline.trigger() {
        Some(trigger) => json!({ trigger.name.clone(): trigger.to_resource()? }),
        None => Value::Null,
    };

    Ok(json!({
        "pipeline": resource,
        "trigger": trigger,
    }))
}
