// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Native resource documents
//!
//! These are the shapes pushed to the remote service. They are built from
//! the activity and pipeline model and only ever serialized.

use serde::{Deserialize, Serialize};

use crate::activity::{Activity, ActivityKind, DependencyCondition};
use crate::schedule::Recurrence;

/// Reference to a named dataset, linked service or pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference_name: String,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            reference_name: name.into(),
        }
    }
}

/// Expression value evaluated by the service at run time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
}

impl Expression {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            kind: "Expression",
            value: value.into(),
        }
    }
}

/// A source or sink identified by its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Typed {
    #[serde(rename = "type")]
    pub kind: String,
}

impl Typed {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

/// Store settings of a delete activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSettings {
    pub recursive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard_file_name: Option<String>,
}

/// One entry of an activity's `depends_on` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDependency {
    pub activity: String,
    pub dependency_conditions: Vec<DependencyCondition>,
}

/// Type-specific fields of an emitted activity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActivityProperties {
    Copy {
        inputs: Vec<Reference>,
        outputs: Vec<Reference>,
        source: Typed,
        sink: Typed,
    },
    Delete {
        dataset: Reference,
        store_settings: StoreSettings,
    },
    DatabricksSparkPython {
        python_file: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        parameters: Vec<String>,
    },
    Lookup {
        dataset: Reference,
        source: Typed,
    },
    SqlServerStoredProcedure {
        stored_procedure_name: String,
        linked_service_name: Reference,
    },
    ExecutePipeline {
        pipeline: Reference,
    },
    SetVariable {
        #[serde(skip_serializing_if = "Option::is_none")]
        variable_name: Option<String>,
        value: String,
    },
    IfCondition {
        expression: Expression,
        if_true_activities: Vec<ActivityResource>,
        if_false_activities: Vec<ActivityResource>,
    },
    ForEach {
        items: Expression,
        activities: Vec<ActivityResource>,
    },
    Wait {
        wait_time_in_seconds: u32,
    },
}

/// An emitted activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub depends_on: Vec<ActivityDependency>,
    #[serde(flatten)]
    pub properties: ActivityProperties,
}

fn emit_all(activities: &[Activity]) -> Vec<ActivityResource> {
    activities.iter().map(ActivityResource::from).collect()
}

impl From<&Activity> for ActivityResource {
    fn from(activity: &Activity) -> Self {
        let properties = match activity.kind() {
            ActivityKind::Copy {
                input_dataset,
                output_dataset,
                source,
                sink,
            } => ActivityProperties::Copy {
                inputs: vec![Reference::new(input_dataset)],
                outputs: vec![Reference::new(output_dataset)],
                source: Typed::new(source),
                sink: Typed::new(sink),
            },
            ActivityKind::Delete {
                dataset,
                recursive,
                wildcard,
            } => ActivityProperties::Delete {
                dataset: Reference::new(dataset),
                store_settings: StoreSettings {
                    recursive: *recursive,
                    wildcard_file_name: wildcard.clone(),
                },
            },
            ActivityKind::DatabricksSparkPython {
                python_file,
                parameters,
            } => ActivityProperties::DatabricksSparkPython {
                python_file: python_file.clone(),
                parameters: parameters.clone(),
            },
            ActivityKind::Lookup { dataset, source } => ActivityProperties::Lookup {
                dataset: Reference::new(dataset),
                source: Typed::new(source),
            },
            ActivityKind::SqlServerStoredProcedure {
                stored_procedure_name,
                linked_service,
            } => ActivityProperties::SqlServerStoredProcedure {
                stored_procedure_name: stored_procedure_name.clone(),
                linked_service_name: Reference::new(linked_service),
            },
            ActivityKind::ExecutePipeline { pipeline } => ActivityProperties::ExecutePipeline {
                pipeline: Reference::new(pipeline),
            },
            ActivityKind::SetVariable {
                variable_name,
                value,
            } => ActivityProperties::SetVariable {
                variable_name: variable_name.clone(),
                value: value.clone(),
            },
            ActivityKind::IfCondition {
                expression,
                if_true_activities,
                if_false_activities,
            } => ActivityProperties::IfCondition {
                expression: Expression::new(expression),
                if_true_activities: emit_all(if_true_activities),
                if_false_activities: emit_all(if_false_activities),
            },
            ActivityKind::ForEach { items, activities } => ActivityProperties::ForEach {
                items: Expression::new(items),
                activities: emit_all(activities),
            },
            ActivityKind::Wait { seconds } => ActivityProperties::Wait {
                wait_time_in_seconds: *seconds,
            },
        };

        Self {
            name: activity.name().to_string(),
            kind: activity.kind().type_name(),
            depends_on: activity
                .depends_on()
                .iter()
                .map(|(name, conditions)| ActivityDependency {
                    activity: name.to_string(),
                    dependency_conditions: conditions.to_vec(),
                })
                .collect(),
            properties,
        }
    }
}

/// An emitted pipeline: activities only, the trigger is a separate document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResource {
    pub activities: Vec<ActivityResource>,
}

impl PipelineResource {
    pub fn from_activities(activities: &[Activity]) -> Self {
        Self {
            activities: emit_all(activities),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPipelineReference {
    pub pipeline_reference: Reference,
}

/// Properties of a schedule trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerProperties {
    pub recurrence: Recurrence,
    pub pipelines: Vec<TriggerPipelineReference>,
    pub annotations: Vec<String>,
    pub additional_properties: serde_json::Map<String, serde_json::Value>,
}

/// An emitted schedule trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerResource {
    pub properties: TriggerProperties,
}

impl TriggerResource {
    pub fn new<I, S>(recurrence: Recurrence, pipelines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: TriggerProperties {
                recurrence,
                pipelines: pipelines
                    .into_iter()
                    .map(|name| TriggerPipelineReference {
                        pipeline_reference: Reference::new(name),
                    })
                    .collect(),
                annotations: Vec::new(),
                additional_properties: serde_json::Map::new(),
            },
        }
    }
}
