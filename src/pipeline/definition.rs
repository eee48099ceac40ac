// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Pipeline definition
//!
//! A pipeline is identified by its name alone. Two pipelines with the same
//! name are equal, hash the same and sort together, whatever their
//! activities.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::activity::Activity;
use crate::errors::{AdflowError, AdflowResult};
use crate::resource::PipelineResource;
use crate::schedule::{ScheduleTrigger, DEFAULT_TIME_ZONE};

/// An ordered set of activities with an optional recurrence schedule
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    activities: Vec<Activity>,
    schedule: Option<String>,
    start_time: Option<DateTime<Utc>>,
    time_zone: String,
    depends_on_pipelines: BTreeSet<Arc<Pipeline>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            activities: Vec::new(),
            schedule: None,
            start_time: None,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            depends_on_pipelines: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Append an activity and return it for further wiring
    pub fn add_activity(&mut self, activity: Activity) -> &mut Activity {
        self.activities.push(activity);
        let last = self.activities.len() - 1;
        &mut self.activities[last]
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_activities(mut self, activities: impl IntoIterator<Item = Activity>) -> Self {
        self.activities.extend(activities);
        self
    }

    /// Top-level activity by name
    pub fn activity(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name() == name)
    }

    pub fn activity_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.name() == name)
    }

    /// Wire the named top-level activities into a line: each one runs after
    /// the name before it
    pub fn chain<S: AsRef<str>>(&mut self, names: &[S]) -> AdflowResult<()> {
        for name in names {
            if self.activity(name.as_ref()).is_none() {
                return Err(AdflowError::ActivityNotFound {
                    pipeline: self.name.clone(),
                    activity: name.as_ref().to_string(),
                });
            }
        }

        for pair in names.windows(2) {
            let previous = pair[0].as_ref().to_string();
            if let Some(next) = self.activity_mut(pair[1].as_ref()) {
                next.add_dependency(previous, &[]);
            }
        }
        Ok(())
    }

    pub fn schedule(&self) -> Option<&str> {
        self.schedule.as_deref()
    }

    /// Attach a schedule.
    ///
    /// The expression is not checked here; it is compiled when the trigger is
    /// emitted. If no start time has been set, now (UTC) is captured once.
    pub fn set_schedule(&mut self, schedule: impl Into<String>) {
        self.schedule = Some(schedule.into());
        if self.start_time.is_none() {
            self.start_time = Some(Utc::now());
        }
    }

    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.set_schedule(schedule);
        self
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) {
        self.start_time = Some(start_time);
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.set_start_time(start_time);
        self
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Require `other` to exist remotely before this pipeline is pushed
    pub fn add_pipeline_dependency(&mut self, other: Arc<Pipeline>) {
        self.depends_on_pipelines.insert(other);
    }

    pub fn depends_on(mut self, other: Arc<Pipeline>) -> Self {
        self.add_pipeline_dependency(other);
        self
    }

    /// Required pipelines, in name order
    pub fn depends_on_pipelines(&self) -> impl Iterator<Item = &Arc<Pipeline>> {
        self.depends_on_pipelines.iter()
    }

    pub fn trigger_name(&self) -> String {
        format!("{}-trigger", self.name)
    }

    /// The trigger owned by this pipeline, if it has a schedule
    pub fn trigger(&self) -> Option<ScheduleTrigger> {
        let schedule = self.schedule.as_ref()?;
        let start_time = self.start_time.unwrap_or_else(Utc::now);

        Some(
            ScheduleTrigger::new(self.trigger_name(), schedule.clone(), start_time, [self.name.clone()])
                .with_time_zone(self.time_zone.clone()),
        )
    }

    /// Emit the native pipeline document.
    ///
    /// Fails if an activity name is reused anywhere in the pipeline, or if any
    /// activity depends on a name missing from its own scope.
    pub fn to_resource(&self) -> AdflowResult<PipelineResource> {
        let mut seen = HashSet::new();
        for activity in self.activities.iter().flat_map(Activity::walk) {
            if !seen.insert(activity.name()) {
                return Err(AdflowError::DuplicateActivity {
                    pipeline: self.name.clone(),
                    activity: activity.name().to_string(),
                });
            }
        }

        check_scope(&self.activities)?;
        Ok(PipelineResource::from_activities(&self.activities))
    }
}

/// Every dependency must name a sibling; children are checked in their own scopes
fn check_scope(activities: &[Activity]) -> AdflowResult<()> {
    let names: HashSet<&str> = activities.iter().map(Activity::name).collect();

    for activity in activities {
        if let Some(missing) = activity.depends_on().names().find(|dep| !names.contains(dep)) {
            return Err(AdflowError::DanglingDependency {
                activity: activity.name().to_string(),
                dependency: missing.to_string(),
            });
        }
        for scope in activity.child_scopes() {
            check_scope(scope)?;
        }
    }
    Ok(())
}

impl PartialEq for Pipeline {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Pipeline {}

impl Hash for Pipeline {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Pipeline {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pipeline {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
