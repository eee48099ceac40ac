// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Declarative pipeline manifests
//!
//! A manifest lists pipelines, their activities and schedules in YAML (or
//! TOML, chosen by file extension). Loading a directory merges every
//! manifest found under it.
//!
//! ```yaml
//! version: "1"
//! pipelines:
//!   - name: ingest
//!     schedule: "0 5 * * *"
//!     depends_on_pipelines: [watermark]
//!     activities:
//!       - name: extract
//!         type: lookup
//!         dataset: watermark
//!         source: AzureSqlSource
//!       - name: load
//!         type: copy
//!         input_dataset: raw
//!         output_dataset: curated
//!         source: BlobSource
//!         sink: BlobSink
//!         depends_on: [extract]
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::activity::Activity;
use crate::errors::{AdflowError, AdflowResult};
use crate::pipeline::{DagBuilder, Node, Pipeline, PipelineRegistry};

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "adflow.yaml";

/// Extensions picked up when loading a directory
const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "toml"];

/// A manifest document
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Manifest version (for future compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub pipelines: Vec<PipelineDef>,
}

fn default_version() -> String {
    "1".to_string()
}

/// One pipeline as written in a manifest
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineDef {
    pub name: String,

    /// Preset token or five-field cron string
    #[serde(default)]
    pub schedule: Option<String>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub time_zone: Option<String>,

    /// Names of pipelines that must be pushed first
    #[serde(default)]
    pub depends_on_pipelines: Vec<String>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    /// Lines of top-level activity names, each wired in order
    #[serde(default)]
    pub chains: Vec<Vec<String>>,
}

impl PipelineDef {
    /// Build the pipeline, resolving pipeline dependencies against `registry`
    fn build(self, registry: &PipelineRegistry) -> AdflowResult<Pipeline> {
        let mut pipeline = Pipeline::new(self.name).with_activities(self.activities);

        for chain in &self.chains {
            pipeline.chain(chain.as_slice())?;
        }

        // Start time first, so the schedule does not capture "now"
        if let Some(start_time) = self.start_time {
            pipeline.set_start_time(start_time);
        }
        if let Some(schedule) = self.schedule {
            pipeline.set_schedule(schedule);
        }
        if let Some(time_zone) = self.time_zone {
            pipeline = pipeline.with_time_zone(time_zone);
        }

        for dependency in &self.depends_on_pipelines {
            let required = registry.get(dependency).ok_or_else(|| AdflowError::UnknownPipeline {
                pipeline: pipeline.name().to_string(),
                dependency: dependency.clone(),
            })?;
            pipeline.add_pipeline_dependency(required.clone());
        }

        Ok(pipeline)
    }
}

impl Manifest {
    /// Load a manifest file, or every manifest under a directory
    pub fn load(path: &Path) -> AdflowResult<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else if path.is_file() {
            Self::from_file(path)
        } else {
            Err(AdflowError::ManifestNotFound {
                path: path.to_path_buf(),
            })
        }
    }

    /// Load a manifest file, parsing TOML for `.toml` and YAML otherwise
    pub fn from_file(path: &Path) -> AdflowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AdflowError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let manifest = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content)?,
            _ => Self::from_yaml(&content)?,
        };
        debug!(
            "Loaded {} pipeline(s) from {}",
            manifest.pipelines.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Merge every manifest found under `dir`, in path order
    pub fn from_dir(dir: &Path) -> AdflowResult<Self> {
        let mut files: Vec<PathBuf> = Vec::new();
        for extension in MANIFEST_EXTENSIONS {
            let pattern = format!("{}/**/*.{}", dir.display(), extension);
            for entry in glob::glob(&pattern)? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => debug!("Skipping unreadable path: {}", e),
                }
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(AdflowError::InvalidManifest {
                reason: format!("no manifest files found under {}", dir.display()),
                help: Some("Manifests must end in .yaml, .yml or .toml".into()),
            });
        }

        let mut merged = Manifest {
            version: default_version(),
            pipelines: Vec::new(),
        };
        for file in &files {
            merged.pipelines.extend(Self::from_file(file)?.pipelines);
        }
        info!("Loaded {} manifest file(s) from {}", files.len(), dir.display());

        Ok(merged)
    }

    pub fn from_yaml(yaml: &str) -> AdflowResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    pub fn from_toml(content: &str) -> AdflowResult<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// Build every pipeline into a registry.
    ///
    /// Pipelines are built after the pipelines they depend on, so each one
    /// can hold its dependencies directly.
    pub fn into_registry(self) -> AdflowResult<PipelineRegistry> {
        let mut seen = HashSet::new();
        for def in &self.pipelines {
            if !seen.insert(def.name.as_str()) {
                return Err(AdflowError::DuplicatePipeline {
                    name: def.name.clone(),
                });
            }
        }

        let order = {
            let nodes = self.pipelines.iter().map(|def| Node {
                name: def.name.as_str(),
                label: "pipeline",
                edges: def.depends_on_pipelines.iter().map(String::as_str).collect(),
            });
            let dag = DagBuilder::from_nodes(nodes, |pipeline, dependency| {
                AdflowError::UnknownPipeline {
                    pipeline: pipeline.to_string(),
                    dependency: dependency.to_string(),
                }
            })?;
            dag.topological_order()?
        };

        let mut defs: Vec<Option<PipelineDef>> = self.pipelines.into_iter().map(Some).collect();
        let mut registry = PipelineRegistry::new();
        for position in order {
            if let Some(def) = defs[position].take() {
                let pipeline = def.build(&registry)?;
                registry.register(pipeline)?;
            }
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, DependencyCondition};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
version: "1"
pipelines:
  - name: ingest
    schedule: "0 5 * * *"
    start_time: "2024-01-01T00:00:00Z"
    depends_on_pipelines: [watermark]
    activities:
      - name: extract
        type: lookup
        dataset: watermark
        source: AzureSqlSource
      - name: load
        type: copy
        input_dataset: raw
        output_dataset: curated
        source: BlobSource
        sink: BlobSink
        depends_on:
          extract: [Succeeded, Skipped]
      - name: each_table
        type: for_each
        items: "@activity('extract').output.value"
        activities:
          - name: first
            type: wait
            seconds: 1
          - name: second
            type: wait
            seconds: 1
  - name: watermark
    activities:
      - name: refresh
        type: sql_server_stored_procedure
        stored_procedure_name: sp_refresh
        linked_service: sql
"#;

    #[test]
    fn test_parse_sample() {
        let manifest = Manifest::from_yaml(SAMPLE).unwrap();
        assert_eq!(manifest.pipelines.len(), 2);

        let ingest = &manifest.pipelines[0];
        assert_eq!(ingest.schedule.as_deref(), Some("0 5 * * *"));
        assert_eq!(
            ingest.activities[1].depends_on().get("extract"),
            Some(&[DependencyCondition::Succeeded, DependencyCondition::Skipped][..])
        );

        // Parsed for-each children are chained like built ones
        match ingest.activities[2].kind() {
            ActivityKind::ForEach { activities, .. } => {
                assert!(activities[1].depends_on().contains("first"));
            }
            other => panic!("expected for_each, got {:?}", other),
        }
    }

    #[test]
    fn test_into_registry_links_dependencies() {
        let registry = Manifest::from_yaml(SAMPLE).unwrap().into_registry().unwrap();
        assert_eq!(registry.len(), 2);

        let ingest = registry.get("ingest").unwrap();
        let deps: Vec<&str> = ingest.depends_on_pipelines().map(|p| p.name()).collect();
        assert_eq!(deps, vec!["watermark"]);
        assert_eq!(
            ingest.start_time().unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert!(ingest.trigger().is_some());
        assert!(registry.get("watermark").unwrap().trigger().is_none());
    }

    #[test]
    fn test_unknown_pipeline_dependency() {
        let yaml = r#"
pipelines:
  - name: a
    depends_on_pipelines: [ghost]
"#;
        let err = Manifest::from_yaml(yaml).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, AdflowError::UnknownPipeline { dependency, .. } if dependency == "ghost"));
    }

    #[test]
    fn test_circular_pipeline_dependency() {
        let yaml = r#"
pipelines:
  - name: a
    depends_on_pipelines: [b]
  - name: b
    depends_on_pipelines: [a]
"#;
        let err = Manifest::from_yaml(yaml).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, AdflowError::CircularDependency { .. }));
    }

    #[test]
    fn test_duplicate_pipeline() {
        let yaml = r#"
pipelines:
  - name: a
  - name: a
"#;
        let err = Manifest::from_yaml(yaml).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, AdflowError::DuplicatePipeline { .. }));
    }

    #[test]
    fn test_chains() {
        let yaml = r#"
pipelines:
  - name: p
    activities:
      - {name: a, type: wait, seconds: 1}
      - {name: b, type: wait, seconds: 1}
      - {name: c, type: wait, seconds: 1}
    chains:
      - [a, b, c]
"#;
        let registry = Manifest::from_yaml(yaml).unwrap().into_registry().unwrap();
        let p = registry.get("p").unwrap();
        assert!(p.activity("c").unwrap().depends_on().contains("b"));
    }

    #[test]
    fn test_toml_manifest() {
        let content = r#"
version = "1"

[[pipelines]]
name = "nightly"
schedule = "@daily"

[[pipelines.activities]]
name = "pause"
type = "wait"
seconds = 30
"#;
        let manifest = Manifest::from_toml(content).unwrap();
        assert_eq!(manifest.pipelines[0].name, "nightly");
        assert_eq!(manifest.pipelines[0].activities[0].name(), "pause");
    }

    #[test]
    fn test_load_directory_merges_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("a.yaml"),
            "pipelines:\n  - name: one\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("nested/b.toml"),
            "[[pipelines]]\nname = \"two\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = Manifest::load(dir.path()).unwrap().into_registry().unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["one", "two"]);
    }

    #[test]
    fn test_load_missing_path() {
        let err = Manifest::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, AdflowError::ManifestNotFound { .. }));
    }
}
