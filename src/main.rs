// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! adflow - Declarative Data Factory Pipelines
//!
//! Build, validate and deploy data factory pipelines and their triggers.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adflow::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adflow=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Init { name, force } => adflow::cli::init::run(name, force, cli.verbose).await,
        Commands::Validate { path } => adflow::cli::validate::run(path, cli.verbose).await,
        Commands::Graph {
            path,
            pipeline,
            format,
        } => adflow::cli::graph::run(path, pipeline, format, cli.verbose).await,
        Commands::Schedule {
            expression,
            start_time,
            time_zone,
        } => adflow::cli::schedule::run(expression, start_time, time_zone, cli.verbose).await,
        Commands::Render { path, pipeline } => {
            adflow::cli::render::run(path, pipeline, cli.verbose).await
        }
        Commands::Deploy {
            path,
            target,
            resource_group,
            factory,
            dry_run,
            keep_stale,
        } => {
            adflow::cli::deploy::run(
                path,
                target,
                resource_group,
                factory,
                dry_run,
                keep_stale,
                cli.verbose,
            )
            .await
        }
    }
}
