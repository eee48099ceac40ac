// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Sync driver
//!
//! Pushes every registered pipeline (and its trigger) to a factory, required
//! pipelines first, then deletes remote pipelines that are no longer
//! defined locally.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::{FactoryClient, FactoryScope};
use crate::errors::AdflowResult;
use crate::pipeline::{Pipeline, PipelineRegistry};
use crate::resource::{PipelineResource, TriggerResource};

/// A pipeline ready to push, with its emitted documents
#[derive(Debug, Clone)]
pub struct PlannedPipeline {
    pub name: String,
    pub resource: PipelineResource,
    pub trigger: Option<(String, TriggerResource)>,
}

/// State of one deployment run.
///
/// The processed set lives here, so repeated runs never share it.
#[derive(Debug, Default)]
pub struct DeploymentRun {
    processed: HashSet<String>,
    order: Vec<Arc<Pipeline>>,
}

impl DeploymentRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `pipeline` after everything it requires.
    ///
    /// A pipeline reachable through several dependency paths is visited once.
    pub fn visit(&mut self, pipeline: &Arc<Pipeline>) {
        if !self.processed.insert(pipeline.name().to_string()) {
            return;
        }
        for required in pipeline.depends_on_pipelines() {
            self.visit(required);
        }
        self.order.push(Arc::clone(pipeline));
    }

    pub fn is_processed(&self, name: &str) -> bool {
        self.processed.contains(name)
    }

    /// Pipelines in push order
    pub fn order(&self) -> &[Arc<Pipeline>] {
        &self.order
    }

    /// Order every pipeline of `registry` and emit its documents.
    ///
    /// Emission errors surface here, before anything is pushed.
    pub fn plan(registry: &PipelineRegistry) -> AdflowResult<(Self, Vec<PlannedPipeline>)> {
        let mut run = Self::new();
        for pipeline in registry.iter() {
            run.visit(pipeline);
        }

        let mut planned = Vec::with_capacity(run.order.len());
        for pipeline in &run.order {
            let trigger = match pipeline.trigger() {
                Some(trigger) => Some((trigger.name.clone(), trigger.to_resource()?)),
                None => None,
            };
            planned.push(PlannedPipeline {
                name: pipeline.name().to_string(),
                resource: pipeline.to_resource()?,
                trigger,
            });
        }

        Ok((run, planned))
    }
}

/// Options for a sync
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Report what would change without calling any mutating operation
    pub dry_run: bool,

    /// Delete remote pipelines that are not defined locally
    pub prune: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            prune: true,
        }
    }
}

/// What a sync did (or would do, for a dry run)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pushed_pipelines: Vec<String>,
    pub pushed_triggers: Vec<String>,
    pub deleted_pipelines: Vec<String>,
    pub dry_run: bool,
}

/// Drives a factory client to match a registry
pub struct SyncDriver<C> {
    client: C,
    scope: FactoryScope,
}

impl<C: FactoryClient> SyncDriver<C> {
    pub fn new(client: C, scope: FactoryScope) -> Self {
        Self { client, scope }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn scope(&self) -> &FactoryScope {
        &self.scope
    }

    /// Push every pipeline and trigger, then prune stale pipelines
    pub async fn deploy(
        &self,
        registry: &PipelineRegistry,
        options: &SyncOptions,
    ) -> AdflowResult<SyncReport> {
        let (run, planned) = DeploymentRun::plan(registry)?;
        let mut report = SyncReport {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for item in &planned {
            if options.dry_run {
                debug!("Would create/update pipeline {}", item.name);
            } else {
                info!("Creating/updating pipeline {} in {}", item.name, self.scope);
                self.client
                    .create_or_update_pipeline(&self.scope, &item.name, &item.resource)
                    .await?;
            }
            report.pushed_pipelines.push(item.name.clone());

            if let Some((trigger_name, trigger)) = &item.trigger {
                if !options.dry_run {
                    info!("Creating/updating trigger {}", trigger_name);
                    self.client
                        .create_or_update_trigger(&self.scope, trigger_name, trigger)
                        .await?;
                }
                report.pushed_triggers.push(trigger_name.clone());
            }
        }

        if options.prune {
            report.deleted_pipelines = self.remove_stale(&run, options.dry_run).await?;
        }

        Ok(report)
    }

    /// Delete remote pipelines the run did not process
    async fn remove_stale(&self, run: &DeploymentRun, dry_run: bool) -> AdflowResult<Vec<String>> {
        let existing = self.client.list_pipelines(&self.scope).await?;
        let mut deleted = Vec::new();

        for name in existing {
            if run.is_processed(&name) {
                continue;
            }
            if dry_run {
                debug!("Would delete stale pipeline {}", name);
            } else {
                info!("Pipeline {} no longer exists locally, deleting", name);
                self.client.delete_pipeline(&self.scope, &name).await?;
            }
            deleted.push(name);
        }

        Ok(deleted)
    }
}
