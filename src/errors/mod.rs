// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Error types with actionable messages
//!
//! Every failure carries a diagnostic code and, where one exists, a hint
//! pointing the user at the fix.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for adflow operations
pub type AdflowResult<T> = Result<T, AdflowError>;

/// Main error type for adflow
#[derive(Error, Debug, Diagnostic)]
pub enum AdflowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Schedule Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Malformed schedule '{expression}': expected 5 fields, found {found}")]
    #[diagnostic(
        code(adflow::malformed_schedule),
        help("Use 'minute hour day_of_month month day_of_week' or one of @hourly, @daily, @weekly, @monthly, @yearly")
    )]
    MalformedSchedule { expression: String, found: usize },

    #[error("Cron field '{field}' has value {value}, outside the valid range {min}..={max}")]
    #[diagnostic(code(adflow::invalid_field_range))]
    InvalidFieldRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },

    #[error("Cron field '{field}' has unsupported value '{value}'")]
    #[diagnostic(
        code(adflow::unsupported_field_syntax),
        help("Only '*' or a single integer is supported per field (no lists, ranges or steps)")
    )]
    UnsupportedFieldSyntax { field: &'static str, value: String },

    #[error(
        "Schedule '{expression}' restricts both day-of-month and day-of-week (inexpressible shapes: {})",
        .shapes.join(", ")
    )]
    #[diagnostic(
        code(adflow::unsupported_schedule_shape),
        help("A recurrence can restrict month days or week days, never both")
    )]
    UnsupportedScheduleShape {
        expression: String,
        shapes: Vec<&'static str>,
    },

    #[error("Unknown schedule preset '{token}'")]
    #[diagnostic(
        code(adflow::unknown_preset),
        help("Supported presets: @hourly, @daily, @weekly, @monthly, @yearly")
    )]
    UnknownPreset { token: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Activity '{activity}' depends on unknown activity '{dependency}'")]
    #[diagnostic(
        code(adflow::dangling_dependency),
        help("Check that '{dependency}' is defined in the same pipeline or nesting scope")
    )]
    DanglingDependency { activity: String, dependency: String },

    #[error("Activity name '{activity}' is used more than once in pipeline '{pipeline}'")]
    #[diagnostic(code(adflow::duplicate_activity))]
    DuplicateActivity { pipeline: String, activity: String },

    #[error("Pipeline '{pipeline}' has no activity named '{activity}'")]
    #[diagnostic(code(adflow::activity_not_found))]
    ActivityNotFound { pipeline: String, activity: String },

    #[error("Name '{name}' appears more than once in one dependency graph")]
    #[diagnostic(code(adflow::duplicate_node))]
    DuplicateNode { name: String },

    #[error("Pipeline '{name}' is defined more than once")]
    #[diagnostic(code(adflow::duplicate_pipeline))]
    DuplicatePipeline { name: String },

    #[error("Circular dependency detected: {}", .members.join(" → "))]
    #[diagnostic(
        code(adflow::circular_dependency),
        help("Review the dependencies to remove the cycle")
    )]
    CircularDependency { members: Vec<String> },

    #[error("Pipeline '{pipeline}' depends on unknown pipeline '{dependency}'")]
    #[diagnostic(
        code(adflow::unknown_pipeline),
        help("Check that '{dependency}' is defined in one of the loaded manifests")
    )]
    UnknownPipeline { pipeline: String, dependency: String },

    #[error("Pipeline '{name}' not found")]
    #[diagnostic(code(adflow::pipeline_not_found))]
    PipelineNotFound { name: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Manifest Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Manifest not found: {path}")]
    #[diagnostic(
        code(adflow::manifest_not_found),
        help("Create a manifest with 'adflow init' or point to an existing file or directory")
    )]
    ManifestNotFound { path: PathBuf },

    #[error("Invalid manifest: {reason}")]
    #[diagnostic(code(adflow::invalid_manifest))]
    InvalidManifest {
        reason: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(adflow::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Remote {operation} failed for '{name}': {message}")]
    #[diagnostic(code(adflow::remote_error))]
    Remote {
        operation: &'static str,
        name: String,
        message: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(adflow::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(adflow::yaml_error))]
    Yaml { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(adflow::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(adflow::toml_error))]
    Toml { message: String },

    #[error("Glob pattern error: {message}")]
    #[diagnostic(code(adflow::glob_error))]
    GlobPattern { message: String },
}

impl From<std::io::Error> for AdflowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for AdflowError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for AdflowError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for AdflowError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl From<glob::PatternError> for AdflowError {
    fn from(e: glob::PatternError) -> Self {
        Self::GlobPattern { message: e.to_string() }
    }
}

impl AdflowError {
    /// Create a remote error for a failed client operation
    pub fn remote(operation: &'static str, name: &str, message: impl Into<String>) -> Self {
        Self::Remote {
            operation,
            name: name.to_string(),
            message: message.into(),
        }
    }

    /// Recovery hint for errors that have one
    pub fn suggestion(&self) -> Option<RecoverySuggestion> {
        match self {
            Self::UnsupportedScheduleShape { expression, .. } => {
                Some(RecoverySuggestion::split_schedule(expression))
            }
            Self::CircularDependency { members } => {
                Some(RecoverySuggestion::fix_circular_dependency(members))
            }
            Self::DanglingDependency { activity, dependency } => {
                Some(RecoverySuggestion::fix_dangling_dependency(activity, dependency))
            }
            Self::ManifestNotFound { .. } => Some(RecoverySuggestion::create_manifest()),
            _ => None,
        }
    }
}
