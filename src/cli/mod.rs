// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for adflow.

pub mod deploy;
pub mod graph;
pub mod init;
pub mod render;
pub mod schedule;
pub mod validate;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::{Path, PathBuf};

use crate::errors::AdflowError;
use crate::manifest::{Manifest, DEFAULT_MANIFEST};
use crate::pipeline::PipelineRegistry;

/// Data factory pipeline builder
///
/// Define pipelines, triggers and their dependencies declaratively.
#[derive(Parser, Debug)]
#[clap(
    name = "adflow",
    version,
    about = "Declarative builder for data factory pipelines and triggers",
    long_about = None,
    after_help = "Examples:\n\
        adflow init                             Create a starter adflow.yaml\n\
        adflow validate                         Check every pipeline\n\
        adflow schedule '30 5 * * 2'            Show the recurrence for a cron string\n\
        adflow deploy --target out -g rg -f df  Mirror pipelines into a directory\n\n\
        See 'adflow <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter manifest
    Init {
        /// Name of the example pipeline (defaults to current directory name)
        name: Option<String>,

        /// Overwrite an existing manifest
        #[clap(long)]
        force: bool,
    },

    /// Validate every pipeline in a manifest
    Validate {
        /// Manifest file or directory
        #[clap(default_value = DEFAULT_MANIFEST)]
        path: PathBuf,
    },

    /// Show activity or pipeline dependencies as a graph
    Graph {
        /// Manifest file or directory
        #[clap(default_value = DEFAULT_MANIFEST)]
        path: PathBuf,

        /// Pipeline whose activities to draw (default: the pipeline dependency graph)
        #[clap(short, long)]
        pipeline: Option<String>,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,
    },

    /// Compile a schedule expression and print the recurrence
    Schedule {
        /// Preset (@hourly, @daily, @weekly, @monthly, @yearly) or five-field cron string
        expression: String,

        /// Start time in RFC 3339 (default: now)
        #[clap(long)]
        start_time: Option<DateTime<Utc>>,

        /// Time zone name
        #[clap(long, default_value = crate::schedule::DEFAULT_TIME_ZONE)]
        time_zone: String,
    },

    /// Print the native documents for pipelines and triggers
    Render {
        /// Manifest file or directory
        #[clap(default_value = DEFAULT_MANIFEST)]
        path: PathBuf,

        /// Render only this pipeline
        #[clap(short, long)]
        pipeline: Option<String>,
    },

    /// Push pipelines and triggers into a factory mirror directory
    Deploy {
        /// Manifest file or directory
        #[clap(default_value = DEFAULT_MANIFEST)]
        path: PathBuf,

        /// Root directory of the factory mirror
        #[clap(short, long)]
        target: PathBuf,

        /// Resource group of the factory
        #[clap(short = 'g', long, env = "ADFLOW_RESOURCE_GROUP")]
        resource_group: String,

        /// Factory name
        #[clap(short, long, env = "ADFLOW_FACTORY")]
        factory: String,

        /// Show what would change without writing anything
        #[clap(long)]
        dry_run: bool,

        /// Keep remote pipelines that are no longer defined locally
        #[clap(long)]
        keep_stale: bool,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

/// Load a manifest path into a registry
pub(crate) fn load_registry(path: &Path) -> Result<PipelineRegistry> {
    Manifest::load(path)
        .and_then(Manifest::into_registry)
        .map_err(with_suggestion)
}

/// Print the recovery hint for `error`, if it has one, and convert it
pub(crate) fn with_suggestion(error: AdflowError) -> miette::Report {
    if let Some(suggestion) = error.suggestion() {
        eprintln!("{}", suggestion);
    }
    error.into()
}
