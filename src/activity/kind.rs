// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Activity catalog
//!
//! Each kind maps one-to-one onto a native activity type. Datasets and linked
//! services are referenced by name only.

use serde::Deserialize;

use super::Activity;

/// What an activity does
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    /// Copy data between two datasets
    Copy {
        input_dataset: String,
        output_dataset: String,
        /// Source type, e.g. `BlobSource`
        source: String,
        /// Sink type, e.g. `BlobSink`
        sink: String,
    },

    /// Delete files referenced by a dataset
    Delete {
        dataset: String,
        #[serde(default)]
        recursive: bool,
        #[serde(default)]
        wildcard: Option<String>,
    },

    /// Run a Python file on a Databricks cluster
    DatabricksSparkPython {
        python_file: String,
        #[serde(default)]
        parameters: Vec<String>,
    },

    /// Read a dataset and expose its rows to later activities
    Lookup { dataset: String, source: String },

    /// Call a stored procedure through a linked service
    SqlServerStoredProcedure {
        stored_procedure_name: String,
        linked_service: String,
    },

    /// Invoke another pipeline by name
    ExecutePipeline { pipeline: String },

    /// Assign a pipeline variable
    SetVariable {
        #[serde(default)]
        variable_name: Option<String>,
        value: String,
    },

    /// Branch on an expression
    IfCondition {
        expression: String,
        #[serde(default)]
        if_true_activities: Vec<Activity>,
        #[serde(default)]
        if_false_activities: Vec<Activity>,
    },

    /// Run child activities for every item of an expression
    ForEach {
        items: String,
        #[serde(default)]
        activities: Vec<Activity>,
    },

    /// Pause for a number of seconds
    Wait { seconds: u32 },
}

impl ActivityKind {
    /// Native type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Copy { .. } => "Copy",
            Self::Delete { .. } => "Delete",
            Self::DatabricksSparkPython { .. } => "DatabricksSparkPython",
            Self::Lookup { .. } => "Lookup",
            Self::SqlServerStoredProcedure { .. } => "SqlServerStoredProcedure",
            Self::ExecutePipeline { .. } => "ExecutePipeline",
            Self::SetVariable { .. } => "SetVariable",
            Self::IfCondition { .. } => "IfCondition",
            Self::ForEach { .. } => "ForEach",
            Self::Wait { .. } => "Wait",
        }
    }

    /// Nested activity lists, each one its own dependency scope
    pub fn child_scopes(&self) -> Vec<&[Activity]> {
        match self {
            Self::IfCondition {
                if_true_activities,
                if_false_activities,
                ..
            } => vec![if_true_activities.as_slice(), if_false_activities.as_slice()],
            Self::ForEach { activities, .. } => vec![activities.as_slice()],
            _ => vec![],
        }
    }

    /// Apply the for-each linear chaining policy.
    ///
    /// Nested branching is not supported inside a for-each, so each child
    /// waits on the child before it.
    pub(crate) fn link_children(&mut self) {
        if let Self::ForEach { activities, .. } = self {
            for i in 1..activities.len() {
                let previous = activities[i - 1].name().to_string();
                activities[i].add_dependency(previous, &[]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_kind() {
        let yaml = r#"
type: delete
dataset: staging
recursive: true
wildcard: "foo_temp*"
"#;
        let kind: ActivityKind = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            kind,
            ActivityKind::Delete {
                dataset: "staging".into(),
                recursive: true,
                wildcard: Some("foo_temp*".into()),
            }
        );
        assert_eq!(kind.type_name(), "Delete");
    }

    #[test]
    fn test_child_scopes() {
        let kind = ActivityKind::IfCondition {
            expression: "@true".into(),
            if_true_activities: vec![Activity::wait("a", 1)],
            if_false_activities: vec![],
        };
        let scopes = kind.child_scopes();
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].len(), 1);
        assert!(scopes[1].is_empty());

        assert!(ActivityKind::Wait { seconds: 1 }.child_scopes().is_empty());
    }
}
