//! Time source and temporal value handling.
//!
//! All timestamp stamping goes through the [`Clock`] trait so the
//! non-decreasing `updatedAt` invariant and the one-time transition stamps
//! can be exercised deterministically in tests.

use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. For tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// A clock frozen at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock poisoned") = now;
    }

    /// Advances the clock by a duration.
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}

/// Parses a temporal value out of a document field.
///
/// Two boundary representations are recognized: RFC 3339 strings and
/// signed 64-bit epoch milliseconds. Anything else is not a date.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Renders an instant in the canonical stored form (RFC 3339, millisecond
/// precision, UTC).
pub fn timestamp_value(instant: DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rfc3339_round_trip() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let stored = timestamp_value(instant);
        assert_eq!(parse_timestamp(&stored).unwrap(), instant);
    }

    #[test]
    fn test_epoch_millis_parsed() {
        let parsed = parse_timestamp(&json!(1_740_000_000_000_i64)).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_740_000_000_000);
    }

    #[test]
    fn test_non_temporal_values_rejected() {
        assert!(parse_timestamp(&json!("not a date")).is_none());
        assert!(parse_timestamp(&json!(true)).is_none());
        assert!(parse_timestamp(&json!([1])).is_none());
        assert!(parse_timestamp(&json!(1.5)).is_none());
    }

    #[test]
    fn test_fixed_clock_advances() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let clock = FixedClock::at(instant);
        assert_eq!(clock.now(), instant);

        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(clock.now(), instant + chrono::Duration::seconds(30));
    }
}
