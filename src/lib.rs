// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! # adflow - Declarative Data Factory Pipelines
//!
//! `adflow` builds data factory pipelines, their schedule triggers and the
//! dependencies between them, then pushes the native documents to a factory.
//!
//! ## Features
//!
//! - **Activity wiring** - `then`/`after` instead of hand-written dependency lists
//! - **Composite activities** - for-each children run one after another
//! - **Schedules** - cron strings and presets compile to native recurrences
//! - **Sync** - pipelines are pushed required-first and stale ones are deleted
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a starter manifest
//! adflow init sales
//!
//! # Check it
//! adflow validate
//!
//! # See what a cron string becomes
//! adflow schedule '30 5 * * 2'
//!
//! # Mirror everything into a directory
//! adflow deploy --target out -g analytics -f sales-factory
//! ```
//!
//! ## Library use
//!
//! ```
//! use adflow::{Activity, Pipeline};
//!
//! let mut extract = Activity::lookup("extract", "tables", "AzureSqlSource");
//! let mut load = Activity::wait("load", 10);
//! extract.then(&mut load);
//!
//! let pipeline = Pipeline::new("nightly")
//!     .with_activities(vec![extract, load])
//!     .with_schedule("@daily");
//!
//! assert_eq!(pipeline.trigger_name(), "nightly-trigger");
//! assert!(pipeline.to_resource().is_ok());
//! ```

pub mod activity;
pub mod cli;
pub mod errors;
pub mod manifest;
pub mod pipeline;
pub mod resource;
pub mod schedule;
pub mod sync;
pub mod utils;

// Re-export commonly used types
pub use activity::{Activity, ActivityKind, Dependencies, DependencyCondition};
pub use errors::{AdflowError, AdflowResult};
pub use manifest::Manifest;
pub use pipeline::{DagBuilder, Pipeline, PipelineRegistry, PipelineValidator};
pub use schedule::{Recurrence, Schedule, ScheduleTrigger};
pub use sync::{FactoryClient, FactoryScope, SyncDriver, SyncOptions, SyncReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
