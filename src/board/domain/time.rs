//! Timestamp helpers shared by the task aggregate and its wire format.
//!
//! Timestamps are truncated to millisecond precision when read from the
//! clock. The persisted form is RFC 3339 with three fractional digits and a
//! `Z` suffix, so a save/load cycle reproduces every timestamp exactly.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serializer};

/// Returns the current clock reading truncated to milliseconds.
#[must_use]
pub fn now_millis(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(3)
}

/// Returns the timestamp that follows `previous` for a mutation observed at
/// `now`.
///
/// The result is strictly later than `previous` even when the clock stalls
/// or steps backwards.
#[must_use]
pub fn advance_past(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        return now;
    }
    previous
        .checked_add_signed(TimeDelta::milliseconds(1))
        .unwrap_or(previous)
}

/// Formats a timestamp in the persisted ISO-8601 form.
#[must_use]
pub fn to_iso(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_iso<E: serde::de::Error>(raw: &str) -> Result<DateTime<Utc>, E> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| E::custom(format!("invalid ISO-8601 timestamp '{raw}': {err}")))
}

/// Serializes a required timestamp.
///
/// # Errors
///
/// Propagates serializer failures.
pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_iso(value))
}

/// Deserializes a required timestamp from any RFC 3339 string.
///
/// # Errors
///
/// Fails when the value is not a string or is not valid RFC 3339.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_iso(&raw)
}

/// Serde adapters for optional timestamps.
pub mod option {
    use super::{parse_iso, to_iso};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes an optional timestamp, writing `null` for `None`.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => serializer.serialize_some(&to_iso(timestamp)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional timestamp; `null` maps to `None`.
    ///
    /// # Errors
    ///
    /// Fails when a present value is not valid RFC 3339.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_iso(&raw))
            .transpose()
    }
}
