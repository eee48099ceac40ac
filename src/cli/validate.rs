// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Validate command - check every pipeline in a manifest

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::pipeline::{DagBuilder, PipelineValidator};

/// Run the validate command
pub async fn run(path: PathBuf, verbose: bool) -> Result<()> {
    println!("{}", "Validating pipelines...".bold());
    println!();

    let registry = match super::load_registry(&path) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("  {} Failed to load {}", "✗".red(), path.display());
            eprintln!();
            return Err(e);
        }
    };

    println!(
        "  {} Loaded {} pipeline(s) from {}",
        "✓".green(),
        registry.len(),
        path.display()
    );

    let mut error_count = 0;
    let mut warning_count = 0;

    for pipeline in registry.iter() {
        let validation = PipelineValidator::validate(pipeline);
        error_count += validation.errors.len();
        warning_count += validation.warnings.len();

        if validation.is_valid() && !validation.has_warnings() && !verbose {
            continue;
        }

        println!();
        let marker = if validation.is_valid() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{} {}", marker, pipeline.name().bold());

        for error in &validation.errors {
            println!("  {} {}", "✗".red(), error);
        }
        for warning in &validation.warnings {
            println!("  {} {}", "⚠".yellow(), warning);
        }

        if verbose {
            if let Some(schedule) = pipeline.schedule() {
                println!("  Schedule: {}", schedule);
            }
            if let Ok(order) =
                DagBuilder::build(pipeline.activities()).and_then(|dag| dag.topological_order_names())
            {
                println!("  Run order: {}", order.join(" → "));
            }
            for activity in pipeline.activities() {
                let deps: Vec<&str> = activity.depends_on().names().collect();
                let deps = if deps.is_empty() {
                    String::new()
                } else {
                    format!(" [depends: {}]", deps.join(", "))
                };
                println!(
                    "    - {} ({}){}",
                    activity.name(),
                    activity.kind().type_name(),
                    deps.dimmed()
                );
            }
        }
    }

    println!();

    if error_count > 0 {
        Err(miette::miette!(
            "Validation failed with {} error(s)",
            error_count
        ))
    } else if warning_count > 0 {
        println!("{}", "Pipelines are valid but have warnings.".yellow().bold());
        Ok(())
    } else {
        println!("{}", "All pipelines are valid!".green().bold());
        Ok(())
    }
}
