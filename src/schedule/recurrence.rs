// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Native recurrence model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::cron::Weekday;

/// Base unit a trigger repeats on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Hour,
    Day,
    Week,
    Month,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "Hour"),
            Self::Day => write!(f, "Day"),
            Self::Week => write!(f, "Week"),
            Self::Month => write!(f, "Month"),
        }
    }
}

/// Fine-grained restriction of when a recurrence fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSchedule {
    pub hours: Vec<u32>,
    pub minutes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_days: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_days: Option<Vec<Weekday>>,
}

impl RecurrenceSchedule {
    /// Restrict to the given hours and minutes
    pub fn at(hours: Vec<u32>, minutes: Vec<u32>) -> Self {
        Self {
            hours,
            minutes,
            ..Default::default()
        }
    }

    pub fn on_month_day(mut self, day: u32) -> Self {
        self.month_days = Some(vec![day]);
        self
    }

    pub fn on_weekday(mut self, day: Weekday) -> Self {
        self.week_days = Some(vec![day]);
        self
    }
}

/// A compiled recurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub start_time: DateTime<Utc>,
    pub time_zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RecurrenceSchedule>,
}

impl Recurrence {
    pub fn new(
        frequency: Frequency,
        interval: u32,
        start_time: DateTime<Utc>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            frequency,
            interval,
            start_time,
            time_zone: time_zone.into(),
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, schedule: RecurrenceSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// One-line human summary, e.g. `every 1 Week on Tuesday at 05:30`
    pub fn describe(&self) -> String {
        let mut out = format!("every {} {}", self.interval, self.frequency);

        if let Some(schedule) = &self.schedule {
            if let Some(days) = &schedule.month_days {
                let days: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                out.push_str(&format!(" on day {}", days.join(", ")));
            }
            if let Some(days) = &schedule.week_days {
                let days: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                out.push_str(&format!(" on {}", days.join(", ")));
            }
            match (schedule.hours.as_slice(), schedule.minutes.as_slice()) {
                ([hour], [minute]) => out.push_str(&format!(" at {:02}:{:02}", hour, minute)),
                ([hour], _) => out.push_str(&format!(" every minute of hour {:02}", hour)),
                (_, [minute]) => out.push_str(&format!(" at minute {} of every hour", minute)),
                _ => out.push_str(" every minute"),
            }
        }

        out
    }
}

/// Every hour of the day
pub(crate) fn all_hours() -> Vec<u32> {
    (0..24).collect()
}

/// Every minute of the hour
pub(crate) fn all_minutes() -> Vec<u32> {
    (0..60).collect()
}
