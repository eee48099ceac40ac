// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Directory-backed factory
//!
//! Mirrors a factory on disk as JSON documents:
//!
//! ```text
//! <root>/<resource_group>/<factory_name>/pipelines/<name>.json
//! <root>/<resource_group>/<factory_name>/triggers/<name>.json
//! ```

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::{FactoryClient, FactoryScope};
use crate::errors::{AdflowError, AdflowResult};
use crate::resource::{PipelineResource, TriggerResource};

const PIPELINES_DIR: &str = "pipelines";
const TRIGGERS_DIR: &str = "triggers";

/// Factory client that writes documents under a root directory
pub struct DirectoryFactory {
    root: PathBuf,
}

impl DirectoryFactory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one kind of document for `scope`
    pub fn kind_dir(&self, scope: &FactoryScope, kind: &str) -> AdflowResult<PathBuf> {
        let scope_name = scope.to_string();
        Ok(self
            .root
            .join(segment("resolve", &scope_name, &scope.resource_group)?)
            .join(segment("resolve", &scope_name, &scope.factory_name)?)
            .join(kind))
    }

    /// Get path for a document
    fn document_path(
        &self,
        operation: &'static str,
        scope: &FactoryScope,
        kind: &str,
        name: &str,
    ) -> AdflowResult<PathBuf> {
        let file = format!("{}.json", segment(operation, name, name)?);
        Ok(self.kind_dir(scope, kind)?.join(file))
    }

    async fn write_document<T: Serialize + Sync>(
        &self,
        scope: &FactoryScope,
        kind: &str,
        name: &str,
        document: &T,
    ) -> AdflowResult<()> {
        let path = self.document_path("write", scope, kind, name)?;
        let dir = self.kind_dir(scope, kind)?;
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            AdflowError::remote("write", name, format!("failed to create {}: {}", dir.display(), e))
        })?;

        let content = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&path, content).await.map_err(|e| {
            AdflowError::remote("write", name, format!("failed to write {}: {}", path.display(), e))
        })?;

        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// `value` as a single path component, so documents stay under their directory
fn segment<'a>(operation: &'static str, name: &str, value: &'a str) -> AdflowResult<&'a str> {
    let mut components = Path::new(value).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if !single || value.contains(['/', '\\', '\0']) {
        return Err(AdflowError::remote(
            operation,
            name,
            format!("'{}' is not a valid file name", value),
        ));
    }
    Ok(value)
}

#[async_trait]
impl FactoryClient for DirectoryFactory {
    async fn list_pipelines(&self, scope: &FactoryScope) -> AdflowResult<Vec<String>> {
        let dir = self.kind_dir(scope, PIPELINES_DIR)?;
        let mut names = Vec::new();

        if !dir.exists() {
            return Ok(names);
        }

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            AdflowError::remote("list", &scope.to_string(), format!("failed to read {}: {}", dir.display(), e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    async fn create_or_update_pipeline(
        &self,
        scope: &FactoryScope,
        name: &str,
        pipeline: &PipelineResource,
    ) -> AdflowResult<()> {
        self.write_document(scope, PIPELINES_DIR, name, pipeline).await
    }

    async fn delete_pipeline(&self, scope: &FactoryScope, name: &str) -> AdflowResult<()> {
        let path = self.document_path("delete", scope, PIPELINES_DIR, name)?;
        tokio::fs::remove_file(&path).await.map_err(|e| {
            AdflowError::remote("delete", name, format!("failed to remove {}: {}", path.display(), e))
        })
    }

    async fn create_or_update_trigger(
        &self,
        scope: &FactoryScope,
        name: &str,
        trigger: &TriggerResource,
    ) -> AdflowResult<()> {
        self.write_document(scope, TRIGGERS_DIR, name, trigger).await
    }
}
