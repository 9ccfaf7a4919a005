//! Value correction for date and time fields.
//!
//! Before a filter on a temporal field is compiled, its values pass through a
//! [`ValueCorrector`]. The default [`DateValueCorrector`] turns date text into
//! timestamps and widens day-precision bounds to whole days, so that
//! `created between 2024-01-01 and 2024-01-31` includes the last day. A bare
//! time of day has no day boundary and is left as written.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::param::Operator;
use crate::value::SqlValue;

/// Rewrites filter values before binding.
pub trait ValueCorrector: Send + Sync + Debug {
    /// Returns the corrected values for a predicate using `operator`.
    fn correct(&self, values: Vec<SqlValue>, operator: Operator) -> Vec<SqlValue>;
}

/// A corrector that leaves values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ValueCorrector for PassThrough {
    fn correct(&self, values: Vec<SqlValue>, _operator: Operator) -> Vec<SqlValue> {
        values
    }
}

/// Precision of a parsed date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePrecision {
    /// Date only (e.g. "2024-01-15").
    Day,
    /// Date and time.
    Time,
}

/// Which end of a range a value bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Lower,
    Upper,
}

/// Parses date text into timestamps, normalising day-precision values to day
/// boundaries.
///
/// Accepted formats: `yyyy-MM-dd`, `yyyy-MM-dd HH:mm`, `yyyy-MM-dd HH:mm:ss`,
/// the same with a `T` separator, and RFC 3339 (converted to UTC). Upper bounds
/// (`LessEqual`, the second `Between` value) of day precision become
/// `23:59:59`; every other day-precision value becomes `00:00:00`. Time of
/// day text (`HH:mm`, `HH:mm:ss`) passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateValueCorrector;

impl DateValueCorrector {
    fn bound_of(operator: Operator, index: usize) -> Bound {
        match operator {
            Operator::LessEqual => Bound::Upper,
            Operator::Between if index == 1 => Bound::Upper,
            _ => Bound::Lower,
        }
    }

    fn parse(text: &str) -> Option<(NaiveDateTime, DatePrecision)> {
        let text = text.trim();
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some((date.and_time(NaiveTime::MIN), DatePrecision::Day));
        }
        const FORMATS: [&str; 4] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M",
        ];
        for format in FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
                return Some((ts, DatePrecision::Time));
            }
        }
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| (dt.naive_utc(), DatePrecision::Time))
    }

    fn is_time_of_day(text: &str) -> bool {
        let text = text.trim();
        ["%H:%M:%S", "%H:%M"]
            .iter()
            .any(|format| NaiveTime::parse_from_str(text, format).is_ok())
    }

    fn correct_one(value: SqlValue, bound: Bound) -> SqlValue {
        let Some(text) = value.as_text() else {
            return value;
        };
        if text.trim().is_empty() {
            return value;
        }
        match Self::parse(text) {
            Some((ts, DatePrecision::Day)) if bound == Bound::Upper => {
                let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
                SqlValue::Timestamp(ts.date().and_time(end_of_day))
            }
            Some((ts, _)) => SqlValue::Timestamp(ts),
            None if Self::is_time_of_day(text) => value,
            None => {
                tracing::warn!(value = %text, "unparseable date value passed through unchanged");
                value
            }
        }
    }
}

impl ValueCorrector for DateValueCorrector {
    fn correct(&self, values: Vec<SqlValue>, operator: Operator) -> Vec<SqlValue> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Self::correct_one(value, Self::bound_of(operator, i)))
            .collect()
    }
}
