// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Five-field cron expressions
//!
//! Only `*` or a single integer is accepted per field. Ranges are checked
//! when the expression is built, before any recurrence logic runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{AdflowError, AdflowResult};

/// One cron field: unrestricted or a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CronField {
    Any,
    Value(u32),
}

impl CronField {
    /// Parse a raw field and check its range.
    ///
    /// Anything that reads as an integer, negative or too large for `u32`
    /// included, is range checked; everything else is unsupported syntax.
    fn parse(field: &'static str, raw: &str, min: u32, max: u32) -> AdflowResult<Self> {
        if raw == "*" {
            return Ok(Self::Any);
        }

        let value = parse_integer(raw).ok_or_else(|| AdflowError::UnsupportedFieldSyntax {
            field,
            value: raw.to_string(),
        })?;
        range_checked(field, value, min, max).map(Self::Value)
    }

    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::Value(v) => Some(*v),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    fn check_range(self, field: &'static str, min: u32, max: u32) -> AdflowResult<Self> {
        match self {
            Self::Any => Ok(self),
            Self::Value(value) => range_checked(field, i64::from(value), min, max).map(Self::Value),
        }
    }
}

/// An optional sign followed by digits, saturating at the `i64` bounds
fn parse_integer(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let saturated = if negative { i64::MIN } else { i64::MAX };
    Some(raw.parse::<i64>().unwrap_or(saturated))
}

fn range_checked(field: &'static str, value: i64, min: u32, max: u32) -> AdflowResult<u32> {
    if value < i64::from(min) || value > i64::from(max) {
        return Err(AdflowError::InvalidFieldRange { field, value, min, max });
    }
    u32::try_from(value).map_err(|_| AdflowError::InvalidFieldRange { field, value, min, max })
}

impl fmt::Display for CronField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*"),
            Self::Value(v) => write!(f, "{}", v),
        }
    }
}

impl From<u32> for CronField {
    fn from(value: u32) -> Self {
        Self::Value(value)
    }
}

/// Day of the week, as named by the recurrence model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Map a cron day-of-week number (0 = Sunday) to a weekday
    pub fn from_cron(day: u32) -> Option<Self> {
        match day {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        write!(f, "{}", name)
    }
}

/// A validated `minute hour day_of_month month day_of_week` expression.
///
/// Only [`CronExpression::new`] and parsing build one, so every concrete
/// field is within its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CronExpression {
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

const MINUTE: (&str, u32, u32) = ("minute", 0, 59);
const HOUR: (&str, u32, u32) = ("hour", 0, 23);
const DAY_OF_MONTH: (&str, u32, u32) = ("day_of_month", 1, 31);
const MONTH: (&str, u32, u32) = ("month", 1, 12);
const DAY_OF_WEEK: (&str, u32, u32) = ("day_of_week", 0, 6);

impl CronExpression {
    /// Build an expression, rejecting any concrete value outside its range
    pub fn new(
        minute: impl Into<CronField>,
        hour: impl Into<CronField>,
        day_of_month: impl Into<CronField>,
        month: impl Into<CronField>,
        day_of_week: impl Into<CronField>,
    ) -> AdflowResult<Self> {
        Ok(Self {
            minute: minute.into().check_range(MINUTE.0, MINUTE.1, MINUTE.2)?,
            hour: hour.into().check_range(HOUR.0, HOUR.1, HOUR.2)?,
            day_of_month: day_of_month
                .into()
                .check_range(DAY_OF_MONTH.0, DAY_OF_MONTH.1, DAY_OF_MONTH.2)?,
            month: month.into().check_range(MONTH.0, MONTH.1, MONTH.2)?,
            day_of_week: day_of_week
                .into()
                .check_range(DAY_OF_WEEK.0, DAY_OF_WEEK.1, DAY_OF_WEEK.2)?,
        })
    }

    pub fn minute(&self) -> CronField {
        self.minute
    }

    pub fn hour(&self) -> CronField {
        self.hour
    }

    pub fn day_of_month(&self) -> CronField {
        self.day_of_month
    }

    pub fn month(&self) -> CronField {
        self.month
    }

    pub fn day_of_week(&self) -> CronField {
        self.day_of_week
    }

    /// Weekday for a concrete day-of-week field
    pub fn weekday(&self) -> Option<Weekday> {
        self.day_of_week.value().and_then(Weekday::from_cron)
    }
}

impl FromStr for CronExpression {
    type Err = AdflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = fields.as_slice() else {
            return Err(AdflowError::MalformedSchedule {
                expression: s.to_string(),
                found: fields.len(),
            });
        };

        let field = |raw: &str, (name, min, max): (&'static str, u32, u32)| {
            CronField::parse(name, raw, min, max)
        };

        Ok(Self {
            minute: field(minute, MINUTE)?,
            hour: field(hour, HOUR)?,
            day_of_month: field(day_of_month, DAY_OF_MONTH)?,
            month: field(month, MONTH)?,
            day_of_week: field(day_of_week, DAY_OF_WEEK)?,
        })
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CronField::Any;

    #[test]
    fn test_parse_wildcards_and_values() {
        let expr: CronExpression = "5 4 * * 2".parse().unwrap();
        assert_eq!(expr.minute(), CronField::Value(5));
        assert_eq!(expr.hour(), CronField::Value(4));
        assert!(expr.day_of_month().is_any());
        assert!(expr.month().is_any());
        assert_eq!(expr.weekday(), Some(Weekday::Tuesday));
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let expr: CronExpression = "  0   12 *\t* *  ".parse().unwrap();
        assert_eq!(expr.to_string(), "0 12 * * *");
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let err = "* * * *".parse::<CronExpression>().unwrap_err();
        assert!(matches!(err, AdflowError::MalformedSchedule { found: 4, .. }));

        let err = "* * * * * *".parse::<CronExpression>().unwrap_err();
        assert!(matches!(err, AdflowError::MalformedSchedule { found: 6, .. }));
    }

    #[test]
    fn test_out_of_range_minute_fails_construction() {
        let err = CronExpression::new(66u32, 12u32, 5u32, 5u32, 3u32).unwrap_err();
        assert!(matches!(
            err,
            AdflowError::InvalidFieldRange {
                field: "minute",
                value: 66,
                min: 0,
                max: 59
            }
        ));
    }

    #[test]
    fn test_range_boundaries() {
        assert!(CronExpression::new(59u32, 23u32, 31u32, 12u32, 6u32).is_ok());
        assert!(CronExpression::new(0u32, 0u32, 1u32, 1u32, 0u32).is_ok());

        assert!(matches!(
            CronExpression::new(Any, 24u32, Any, Any, Any),
            Err(AdflowError::InvalidFieldRange { field: "hour", .. })
        ));
        assert!(matches!(
            CronExpression::new(Any, Any, 0u32, Any, Any),
            Err(AdflowError::InvalidFieldRange { field: "day_of_month", .. })
        ));
        assert!(matches!(
            CronExpression::new(Any, Any, 32u32, Any, Any),
            Err(AdflowError::InvalidFieldRange { field: "day_of_month", .. })
        ));
        assert!(matches!(
            CronExpression::new(Any, Any, Any, 13u32, Any),
            Err(AdflowError::InvalidFieldRange { field: "month", .. })
        ));
        assert!(matches!(
            CronExpression::new(Any, Any, Any, Any, 7u32),
            Err(AdflowError::InvalidFieldRange { field: "day_of_week", .. })
        ));
    }

    #[test]
    fn test_negative_and_oversized_integers_are_range_errors() {
        let err = "-1 * * * *".parse::<CronExpression>().unwrap_err();
        assert!(matches!(
            err,
            AdflowError::InvalidFieldRange {
                field: "minute",
                value: -1,
                min: 0,
                max: 59
            }
        ));

        let err = "* 99999999999 * * *".parse::<CronExpression>().unwrap_err();
        assert!(matches!(
            err,
            AdflowError::InvalidFieldRange {
                field: "hour",
                value: 99999999999,
                ..
            }
        ));

        let err = "* * * * 99999999999999999999999".parse::<CronExpression>().unwrap_err();
        assert!(matches!(
            err,
            AdflowError::InvalidFieldRange {
                field: "day_of_week",
                value: i64::MAX,
                ..
            }
        ));
    }

    #[test]
    fn test_parsed_fields_are_range_checked() {
        let err = "0 0 * * 9".parse::<CronExpression>().unwrap_err();
        assert!(matches!(
            err,
            AdflowError::InvalidFieldRange { field: "day_of_week", value: 9, .. }
        ));
    }

    #[test]
    fn test_out_of_range_values_never_reach_compilation() {
        let built = CronExpression::new(99u32, 99u32, Any, Any, 9u32);
        assert!(matches!(
            built,
            Err(AdflowError::InvalidFieldRange { field: "minute", .. })
        ));
        assert!(CronExpression::new(Any, Any, Any, Any, CronField::Value(9)).is_err());
    }

    #[test]
    fn test_unsupported_syntax() {
        for expr in ["*/5 * * * *", "1-5 * * * *", "* * * * MON", "1,2 * * * *", "- * * * *", "+ * * * *"] {
            let err = expr.parse::<CronExpression>().unwrap_err();
            assert!(
                matches!(err, AdflowError::UnsupportedFieldSyntax { .. }),
                "{} should be rejected as unsupported syntax",
                expr
            );
        }
    }

    #[test]
    fn test_weekday_table() {
        let names: Vec<String> = (0..7)
            .map(|d| Weekday::from_cron(d).unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
        );
        assert_eq!(Weekday::from_cron(7), None);
    }
}
