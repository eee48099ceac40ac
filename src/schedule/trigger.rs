// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Schedule triggers

use chrono::{DateTime, Utc};

use super::{compile, Recurrence, DEFAULT_TIME_ZONE};
use crate::errors::AdflowResult;
use crate::resource::TriggerResource;

/// A trigger that starts its pipelines on a recurring schedule.
///
/// The schedule is kept as written and compiled each time the trigger is
/// emitted, so an invalid expression only fails at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTrigger {
    pub name: String,
    pub schedule: String,
    pub start_time: DateTime<Utc>,
    pub time_zone: String,
    pub pipelines: Vec<String>,
}

impl ScheduleTrigger {
    pub fn new<I, S>(
        name: impl Into<String>,
        schedule: impl Into<String>,
        start_time: DateTime<Utc>,
        pipelines: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            schedule: schedule.into(),
            start_time,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            pipelines: pipelines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn recurrence(&self) -> AdflowResult<Recurrence> {
        compile(&self.schedule, self.start_time, &self.time_zone)
    }

    pub fn to_resource(&self) -> AdflowResult<TriggerResource> {
        Ok(TriggerResource::new(
            self.recurrence()?,
            self.pipelines.iter().cloned(),
        ))
    }
}
