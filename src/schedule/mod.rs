// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Schedule compilation
//!
//! Turns a preset token (`@daily`) or a five-field cron string into the
//! native recurrence model. Compilation is pure: the only time input is the
//! caller-supplied start time.

mod cron;
mod recurrence;
mod trigger;

pub use cron::{CronExpression, CronField, Weekday};
pub use recurrence::{Frequency, Recurrence, RecurrenceSchedule};
pub use trigger::ScheduleTrigger;

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::{AdflowError, AdflowResult};
use recurrence::{all_hours, all_minutes};

/// Default time zone for triggers
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Cron shapes the recurrence model cannot express
pub const INEXPRESSIBLE_SHAPES: [&str; 4] = ["* * 5 * 5", "5 * 5 * 5", "* 5 5 * 5", "5 5 5 * 5"];

/// Named schedule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Preset {
    /// Frequency and interval for this preset.
    ///
    /// There is no yearly unit, so `@yearly` is every 12 months.
    pub fn frequency(&self) -> (Frequency, u32) {
        match self {
            Self::Hourly => (Frequency::Hour, 1),
            Self::Daily => (Frequency::Day, 1),
            Self::Weekly => (Frequency::Week, 1),
            Self::Monthly => (Frequency::Month, 1),
            Self::Yearly => (Frequency::Month, 12),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Hourly => "@hourly",
            Self::Daily => "@daily",
            Self::Weekly => "@weekly",
            Self::Monthly => "@monthly",
            Self::Yearly => "@yearly",
        }
    }
}

impl FromStr for Preset {
    type Err = AdflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "@hourly" => Ok(Self::Hourly),
            "@daily" => Ok(Self::Daily),
            "@weekly" => Ok(Self::Weekly),
            "@monthly" => Ok(Self::Monthly),
            "@yearly" => Ok(Self::Yearly),
            other => Err(AdflowError::UnknownPreset {
                token: other.to_string(),
            }),
        }
    }
}

/// A parsed schedule expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    Preset(Preset),
    Cron(CronExpression),
}

impl FromStr for Schedule {
    type Err = AdflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('@') {
            trimmed.parse().map(Self::Preset)
        } else {
            trimmed.parse().map(Self::Cron)
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preset(preset) => write!(f, "{}", preset.token()),
            Self::Cron(expr) => write!(f, "{}", expr),
        }
    }
}

impl Schedule {
    /// Compile into a recurrence starting at `start_time`
    pub fn compile(&self, start_time: DateTime<Utc>, time_zone: &str) -> AdflowResult<Recurrence> {
        match self {
            Self::Preset(preset) => {
                let (frequency, interval) = preset.frequency();
                Ok(Recurrence::new(frequency, interval, start_time, time_zone))
            }
            Self::Cron(expr) => compile_cron(expr, start_time, time_zone),
        }
    }
}

/// Parse and compile a schedule string in one step
pub fn compile(expression: &str, start_time: DateTime<Utc>, time_zone: &str) -> AdflowResult<Recurrence> {
    let recurrence = expression.parse::<Schedule>()?.compile(start_time, time_zone)?;
    debug!(
        "Compiled schedule '{}' to {}",
        expression,
        recurrence.describe()
    );
    Ok(recurrence)
}

/// Decide the recurrence shape.
///
/// Day-of-week is checked first, then day-of-month, then hour and minute.
fn compile_cron(
    expr: &CronExpression,
    start_time: DateTime<Utc>,
    time_zone: &str,
) -> AdflowResult<Recurrence> {
    if let Some(month) = expr.month().value() {
        warn!(
            "Month field {} in '{}' cannot be expressed as a recurrence and is ignored",
            month, expr
        );
    }

    let hours = expr.hour().value().map(|h| vec![h]).unwrap_or_else(all_hours);
    let minutes = expr.minute().value().map(|m| vec![m]).unwrap_or_else(all_minutes);
    let recurrence = |frequency, interval| Recurrence::new(frequency, interval, start_time, time_zone);

    match (expr.weekday(), expr.day_of_month().value()) {
        (Some(_), Some(_)) => Err(AdflowError::UnsupportedScheduleShape {
            expression: expr.to_string(),
            shapes: INEXPRESSIBLE_SHAPES.to_vec(),
        }),

        (Some(weekday), None) => Ok(recurrence(Frequency::Week, 1)
            .with_schedule(RecurrenceSchedule::at(hours, minutes).on_weekday(weekday))),

        (None, Some(day)) => {
            let frequency = match (expr.hour(), expr.minute()) {
                (CronField::Any, CronField::Value(_)) => Frequency::Day,
                _ => Frequency::Month,
            };
            Ok(recurrence(frequency, 1)
                .with_schedule(RecurrenceSchedule::at(hours, minutes).on_month_day(day)))
        }

        (None, None) => match (expr.hour().value(), expr.minute().value()) {
            (None, None) => Ok(recurrence(Frequency::Day, 1)),
            // The minute field is read as an hour interval here; zero means hourly.
            (None, Some(n)) => Ok(recurrence(Frequency::Hour, n.max(1))),
            (Some(hour), _) => Ok(recurrence(Frequency::Day, 1)
                .with_schedule(RecurrenceSchedule::at(vec![hour], minutes))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn compile_at(expression: &str) -> AdflowResult<Recurrence> {
        compile(expression, start(), DEFAULT_TIME_ZONE)
    }

    #[test]
    fn test_presets() {
        let cases = [
            ("@hourly", Frequency::Hour, 1),
            ("@daily", Frequency::Day, 1),
            ("@weekly", Frequency::Week, 1),
            ("@monthly", Frequency::Month, 1),
            ("@yearly", Frequency::Month, 12),
        ];
        for (token, frequency, interval) in cases {
            let recurrence = compile_at(token).unwrap();
            assert_eq!(recurrence.frequency, frequency, "{}", token);
            assert_eq!(recurrence.interval, interval, "{}", token);
            assert!(recurrence.schedule.is_none());
        }
    }

    #[test]
    fn test_unknown_preset() {
        let err = compile_at("@fortnightly").unwrap_err();
        assert!(matches!(err, AdflowError::UnknownPreset { token } if token == "@fortnightly"));
    }

    #[test]
    fn test_every_minute_is_daily_without_restriction() {
        let recurrence = compile_at("* * * * *").unwrap();
        assert_eq!(recurrence, Recurrence::new(Frequency::Day, 1, start(), "UTC"));
    }

    #[test]
    fn test_minute_only_is_hour_interval() {
        let recurrence = compile_at("25 * * * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Hour);
        assert_eq!(recurrence.interval, 25);
        assert!(recurrence.schedule.is_none());
    }

    #[test]
    fn test_zero_minute_is_hourly() {
        let recurrence = compile_at("0 * * * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Hour);
        assert_eq!(recurrence.interval, 1);
    }

    #[test]
    fn test_hour_only_fires_every_minute_of_that_hour() {
        let recurrence = compile_at("* 7 * * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Day);
        assert_eq!(
            recurrence.schedule,
            Some(RecurrenceSchedule::at(vec![7], (0..60).collect()))
        );
    }

    #[test]
    fn test_daily_at_fixed_time() {
        let recurrence = compile_at("5 5 * * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Day);
        assert_eq!(recurrence.interval, 1);
        assert_eq!(recurrence.schedule, Some(RecurrenceSchedule::at(vec![5], vec![5])));
    }

    #[test]
    fn test_month_day_every_minute() {
        let recurrence = compile_at("* * 15 * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Month);
        assert_eq!(
            recurrence.schedule,
            Some(RecurrenceSchedule::at((0..24).collect(), (0..60).collect()).on_month_day(15))
        );
    }

    #[test]
    fn test_month_day_with_minute_uses_parsed_minute() {
        let recurrence = compile_at("25 * 10 * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Day);
        let schedule = recurrence.schedule.unwrap();
        assert_eq!(schedule.minutes, vec![25]);
        assert_eq!(schedule.hours, (0..24).collect::<Vec<_>>());
        assert_eq!(schedule.month_days, Some(vec![10]));
    }

    #[test]
    fn test_month_day_with_hour() {
        let recurrence = compile_at("* 6 1 * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Month);
        assert_eq!(
            recurrence.schedule,
            Some(RecurrenceSchedule::at(vec![6], (0..60).collect()).on_month_day(1))
        );

        let recurrence = compile_at("30 6 1 * *").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Month);
        assert_eq!(
            recurrence.schedule,
            Some(RecurrenceSchedule::at(vec![6], vec![30]).on_month_day(1))
        );
    }

    #[test]
    fn test_weekday_every_minute() {
        let recurrence = compile_at("* * * * 2").unwrap();
        assert_eq!(recurrence.frequency, Frequency::Week);
        assert_eq!(recurrence.interval, 1);
        let schedule = recurrence.schedule.unwrap();
        assert_eq!(schedule.hours, (0..24).collect::<Vec<_>>());
        assert_eq!(schedule.minutes, (0..60).collect::<Vec<_>>());
        assert_eq!(schedule.week_days, Some(vec![Weekday::Tuesday]));
        assert_eq!(schedule.month_days, None);
    }

    #[test]
    fn test_weekday_at_fixed_time() {
        let recurrence = compile_at("15 22 * * 0").unwrap();
        assert_eq!(
            recurrence.schedule,
            Some(RecurrenceSchedule::at(vec![22], vec![15]).on_weekday(Weekday::Sunday))
        );
    }

    #[test]
    fn test_month_day_and_weekday_is_unsupported() {
        for expression in ["* * 5 * 5", "5 * 5 * 5", "* 5 5 * 5", "5 5 5 * 5"] {
            let err = compile_at(expression).unwrap_err();
            match err {
                AdflowError::UnsupportedScheduleShape { shapes, .. } => {
                    assert_eq!(shapes, INEXPRESSIBLE_SHAPES.to_vec());
                }
                other => panic!("unexpected error for {}: {:?}", expression, other),
            }
        }
    }

    #[test]
    fn test_range_checked_before_shape() {
        let err = compile_at("66 * 5 * 5").unwrap_err();
        assert!(matches!(err, AdflowError::InvalidFieldRange { field: "minute", .. }));
    }

    #[test]
    fn test_concrete_month_is_ignored() {
        assert_eq!(compile_at("5 5 * 6 *").unwrap(), compile_at("5 5 * * *").unwrap());
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let a = serde_json::to_string(&compile_at("10 * 3 * *").unwrap()).unwrap();
        let b = serde_json::to_string(&compile_at("10 * 3 * *").unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_zone_is_carried() {
        let recurrence = compile("@daily", start(), "W. Europe Standard Time").unwrap();
        assert_eq!(recurrence.time_zone, "W. Europe Standard Time");
        assert_eq!(recurrence.start_time, start());
    }

    #[test]
    fn test_schedule_display_round_trips_tokens() {
        let schedule: Schedule = " @weekly ".parse().unwrap();
        assert_eq!(schedule.to_string(), "@weekly");
    }
}
