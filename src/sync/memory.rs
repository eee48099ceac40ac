// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! In-memory factory
//!
//! Keeps pushed documents as JSON values and records every call, so the
//! order of operations can be inspected after a run.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use super::{FactoryClient, FactoryScope};
use crate::errors::{AdflowError, AdflowResult};
use crate::resource::{PipelineResource, TriggerResource};

/// One recorded client call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryCall {
    ListPipelines,
    PutPipeline(String),
    DeletePipeline(String),
    PutTrigger(String),
}

#[derive(Debug, Default)]
struct FactoryState {
    pipelines: BTreeMap<String, Value>,
    triggers: BTreeMap<String, Value>,
}

/// Factory client backed by memory
#[derive(Debug, Default)]
pub struct InMemoryFactory {
    factories: RwLock<HashMap<FactoryScope, FactoryState>>,
    calls: RwLock<Vec<FactoryCall>>,
}

impl InMemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `scope` with existing pipelines, as if pushed by an earlier run
    pub async fn seed_pipelines<I, S>(&self, scope: &FactoryScope, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut factories = self.factories.write().await;
        let state = factories.entry(scope.clone()).or_default();
        for name in names {
            state.pipelines.insert(name.into(), Value::Null);
        }
    }

    /// Pushed pipeline document
    pub async fn pipeline(&self, scope: &FactoryScope, name: &str) -> Option<Value> {
        let factories = self.factories.read().await;
        factories.get(scope)?.pipelines.get(name).cloned()
    }

    /// Pushed trigger document
    pub async fn trigger(&self, scope: &FactoryScope, name: &str) -> Option<Value> {
        let factories = self.factories.read().await;
        factories.get(scope)?.triggers.get(name).cloned()
    }

    pub async fn trigger_names(&self, scope: &FactoryScope) -> Vec<String> {
        let factories = self.factories.read().await;
        factories
            .get(scope)
            .map(|state| state.triggers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every call made so far, in order
    pub async fn calls(&self) -> Vec<FactoryCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: FactoryCall) {
        self.calls.write().await.push(call);
    }
}

#[async_trait]
impl FactoryClient for InMemoryFactory {
    async fn list_pipelines(&self, scope: &FactoryScope) -> AdflowResult<Vec<String>> {
        self.record(FactoryCall::ListPipelines).await;
        let factories = self.factories.read().await;
        Ok(factories
            .get(scope)
            .map(|state| state.pipelines.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn create_or_update_pipeline(
        &self,
        scope: &FactoryScope,
        name: &str,
        pipeline: &PipelineResource,
    ) -> AdflowResult<()> {
        self.record(FactoryCall::PutPipeline(name.to_string())).await;
        let document = serde_json::to_value(pipeline)?;
        let mut factories = self.factories.write().await;
        factories
            .entry(scope.clone())
            .or_default()
            .pipelines
            .insert(name.to_string(), document);
        Ok(())
    }

    async fn delete_pipeline(&self, scope: &FactoryScope, name: &str) -> AdflowResult<()> {
        self.record(FactoryCall::DeletePipeline(name.to_string())).await;
        let mut factories = self.factories.write().await;
        factories
            .get_mut(scope)
            .and_then(|state| state.pipelines.remove(name))
            .map(|_| ())
            .ok_or_else(|| AdflowError::remote("delete", name, "pipeline does not exist"))
    }

    async fn create_or_update_trigger(
        &self,
        scope: &FactoryScope,
        name: &str,
        trigger: &TriggerResource,
    ) -> AdflowResult<()> {
        self.record(FactoryCall::PutTrigger(name.to_string())).await;
        let document = serde_json::to_value(trigger)?;
        let mut factories = self.factories.write().await;
        factories
            .entry(scope.clone())
            .or_default()
            .triggers
            .insert(name.to_string(), document);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let factory = InMemoryFactory::new();
        let dev = FactoryScope::new("rg", "dev");
        let prod = FactoryScope::new("rg", "prod");

        factory.seed_pipelines(&dev, ["a"]).await;
        factory
            .create_or_update_pipeline(&prod, "b", &PipelineResource { activities: vec![] })
            .await
            .unwrap();

        assert_eq!(factory.list_pipelines(&dev).await.unwrap(), vec!["a"]);
        assert_eq!(factory.list_pipelines(&prod).await.unwrap(), vec!["b"]);
        assert_eq!(
            factory.pipeline(&prod, "b").await,
            Some(serde_json::json!({"activities": []}))
        );
    }

    #[tokio::test]
    async fn test_delete_missing_pipeline_fails() {
        let factory = InMemoryFactory::new();
        let scope = FactoryScope::new("rg", "dev");

        let err = factory.delete_pipeline(&scope, "ghost").await.unwrap_err();
        assert!(matches!(err, AdflowError::Remote { operation: "delete", .. }));
        assert_eq!(
            factory.calls().await,
            vec![FactoryCall::DeletePipeline("ghost".into())]
        );
    }
}
