//! UNIX epoch helpers for date range criteria.
//!
//! Range bounds produced here are epoch milliseconds, the unit
//! [`Constraint::set_field_days_ago`](crate::Constraint::set_field_days_ago)
//! stores.

use chrono::{DateTime, Utc};

use crate::constraint::FieldDefinition;
use crate::operator::Operator;

pub const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// How far into the future a seconds-looking value may point and still be
/// treated as seconds.
pub const DEFAULT_HOURS_THRESHOLD: i64 = 25;

/// Scales an epoch expressed in seconds to milliseconds.
///
/// A value counts as seconds when it has as many digits as the current
/// epoch in seconds and is less than `hours_threshold` hours ahead of `now`.
/// Anything else is returned untouched.
pub fn to_milliseconds(value: i64, now: DateTime<Utc>, hours_threshold: i64) -> i64 {
    let seconds = now.timestamp();
    let looks_like_seconds = digit_count(value) == digit_count(seconds);
    if looks_like_seconds && (value - seconds).div_euclid(3600) < hours_threshold {
        value.saturating_mul(1000)
    } else {
        value
    }
}

fn digit_count(value: i64) -> usize {
    value.to_string().len()
}

pub fn date_from_epoch(value: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(to_milliseconds(value, now, DEFAULT_HOURS_THRESHOLD))
}

pub fn days_to_milliseconds(days: f64) -> i64 {
    (days * MILLISECONDS_PER_DAY as f64).round() as i64
}

pub fn milliseconds_to_days(milliseconds: i64) -> f64 {
    milliseconds as f64 / MILLISECONDS_PER_DAY as f64
}

/// `(start, end)` where `start` is `days` before `end`.
pub fn days_ago_range(end: i64, days: f64) -> (i64, i64) {
    (end - days_to_milliseconds(days), end)
}

/// Span in days of a `gte`/`lte` pair, `default_days` when the field does
/// not hold both bounds with numeric values.
pub fn days_ago_from_definition(definition: &FieldDefinition, default_days: f64) -> f64 {
    let first = |operator: Operator| {
        definition
            .get(&operator)
            .and_then(|operands| operands.first())
            .and_then(|operand| operand.as_f64())
    };
    match (first(Operator::Gte), first(Operator::Lte)) {
        (Some(begin), Some(end)) => (end - begin) / MILLISECONDS_PER_DAY as f64,
        _ => default_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Constraint;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1533762055, 251_000_000).unwrap()
    }

    #[test]
    fn seconds_are_scaled() {
        assert_eq!(to_milliseconds(1533762055, now(), DEFAULT_HOURS_THRESHOLD), 1533762055000);
    }

    #[test]
    fn other_magnitudes_are_untouched() {
        let one_missing = 153376205;
        assert_eq!(to_milliseconds(one_missing, now(), DEFAULT_HOURS_THRESHOLD), one_missing);
        let one_too_many = 153376205511;
        assert_eq!(to_milliseconds(one_too_many, now(), DEFAULT_HOURS_THRESHOLD), one_too_many);
    }

    #[test]
    fn far_future_seconds_are_untouched() {
        let in_two_days = now().timestamp() + 2 * 86400;
        assert_eq!(to_milliseconds(in_two_days, now(), DEFAULT_HOURS_THRESHOLD), in_two_days);
    }

    #[test]
    fn date_from_milliseconds() {
        let date = date_from_epoch(1533762055251, now()).unwrap();
        assert_eq!(date.to_rfc3339(), "2018-08-08T21:00:55.251+00:00");
    }

    #[test]
    fn days_ago_round_trip() {
        let (start, end) = days_ago_range(1533762055251, 7.0);
        assert_eq!(end - start, 7 * MILLISECONDS_PER_DAY);
        assert_eq!(milliseconds_to_days(end - start), 7.0);
    }

    #[test]
    fn span_from_definition() {
        let mut subject = Constraint::new();
        subject.set_field_days_ago("CreatedDate", 3.0, now()).unwrap();
        let definition = subject.get_field("CreatedDate");
        assert_eq!(days_ago_from_definition(&definition, 1.0), 3.0);
        assert_eq!(days_ago_from_definition(&subject.get_field("Other"), 1.0), 1.0);
    }
}
