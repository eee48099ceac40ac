// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Deploy command - push pipelines and triggers into a factory mirror

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::pipeline::PipelineValidator;
use crate::sync::{DirectoryFactory, FactoryScope, SyncDriver, SyncOptions, SyncReport};
use crate::utils;

/// Run the deploy command
#[allow(clippy::too_many_arguments)]
pub async fn run(
    path: PathBuf,
    target: PathBuf,
    resource_group: String,
    factory: String,
    dry_run: bool,
    keep_stale: bool,
    verbose: bool,
) -> Result<()> {
    let registry = super::load_registry(&path)?;

    // Refuse to push anything while a pipeline is invalid
    let mut invalid = 0;
    for pipeline in registry.iter() {
        let validation = PipelineValidator::validate(pipeline);
        if !validation.is_valid() {
            eprintln!("{} {}", "✗".red(), pipeline.name().bold());
            for error in &validation.errors {
                eprintln!("  {} {}", "✗".red(), error);
            }
            invalid += 1;
        }
    }
    if invalid > 0 {
        return Err(miette::miette!(
            "{} pipeline(s) failed validation, nothing was deployed",
            invalid
        ));
    }

    let scope = FactoryScope::new(resource_group, factory);
    let driver = SyncDriver::new(DirectoryFactory::new(&target), scope);
    let options = SyncOptions {
        dry_run,
        prune: !keep_stale,
    };

    let spinner = utils::create_spinner(&format!("Deploying to {}...", driver.scope()));
    let result = driver.deploy(&registry, &options).await;
    spinner.finish_and_clear();
    let report = result.map_err(super::with_suggestion)?;

    print_report(&report, driver.scope(), verbose);

    Ok(())
}

fn print_report(report: &SyncReport, scope: &FactoryScope, verbose: bool) {
    let title = if report.dry_run {
        format!("Deployment plan for {} (dry run)", scope)
    } else {
        format!("Deployed to {}", scope)
    };
    utils::print_header(&title);

    let pushed = if report.dry_run { "would push" } else { "pushed" };
    let deleted = if report.dry_run { "would delete" } else { "deleted" };

    for name in &report.pushed_pipelines {
        utils::print_success(&format!("pipeline {} {}", name.cyan(), pushed));
    }
    for name in &report.pushed_triggers {
        utils::print_success(&format!("trigger {} {}", name.cyan(), pushed));
    }
    for name in &report.deleted_pipelines {
        utils::print_warning(&format!("stale pipeline {} {}", name.cyan(), deleted));
    }

    if verbose && report.deleted_pipelines.is_empty() {
        utils::print_info("no stale pipelines");
    }

    println!();
    println!(
        "{} pipeline(s), {} trigger(s), {} deletion(s)",
        report.pushed_pipelines.len().to_string().bold(),
        report.pushed_triggers.len().to_string().bold(),
        report.deleted_pipelines.len().to_string().bold()
    );
}
