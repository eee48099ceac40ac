// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Synchronization with a remote factory
//!
//! This module provides the client trait the sync driver talks to, and two
//! implementations: an in-memory factory and a directory mirror that writes
//! native documents to disk.

mod directory;
mod driver;
mod memory;

pub use directory::DirectoryFactory;
pub use driver::{DeploymentRun, PlannedPipeline, SyncDriver, SyncOptions, SyncReport};
pub use memory::{FactoryCall, InMemoryFactory};

use async_trait::async_trait;
use std::fmt;

use crate::errors::AdflowResult;
use crate::resource::{PipelineResource, TriggerResource};

/// Address of one factory: resource group plus factory name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactoryScope {
    pub resource_group: String,
    pub factory_name: String,
}

impl FactoryScope {
    pub fn new(resource_group: impl Into<String>, factory_name: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            factory_name: factory_name.into(),
        }
    }
}

impl fmt::Display for FactoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.factory_name)
    }
}

/// Management operations the sync driver needs from a remote factory
#[async_trait]
pub trait FactoryClient: Send + Sync {
    /// Names of every pipeline currently in the factory
    async fn list_pipelines(&self, scope: &FactoryScope) -> AdflowResult<Vec<String>>;

    async fn create_or_update_pipeline(
        &self,
        scope: &FactoryScope,
        name: &str,
        pipeline: &PipelineResource,
    ) -> AdflowResult<()>;

    async fn delete_pipeline(&self, scope: &FactoryScope, name: &str) -> AdflowResult<()>;

    async fn create_or_update_trigger(
        &self,
        scope: &FactoryScope,
        name: &str,
        trigger: &TriggerResource,
    ) -> AdflowResult<()>;
}
