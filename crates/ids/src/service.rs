//! Internal implementation of record identifiers.

use crate::{IdError, IdResult};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::{fmt, str::FromStr};

/// Opaque identifier of a ward record.
///
/// The only structural guarantee is that the value is non-empty and contains no whitespace, so
/// it can be embedded in URL paths and CSV cells unchanged. Nothing else about the content is
/// interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct RecordId(String);

impl RecordId {
    /// Validates and wraps an identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is empty or contains whitespace.
    pub fn parse(input: &str) -> IdResult<Self> {
        if input.is_empty() {
            return Err(IdError::InvalidInput("record id cannot be empty".into()));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(IdError::InvalidInput(format!(
                "record id must not contain whitespace, got: '{}'",
                input
            )));
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecordId::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl From<TimestampId> for RecordId {
    fn from(value: TimestampId) -> Self {
        Self(value.to_string())
    }
}

/// An identifier derived from its creation instant.
///
/// Format: milliseconds since the Unix epoch as decimal digits, e.g. `1705762800000`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampId {
    timestamp: DateTime<Utc>,
}

impl TimestampId {
    /// Returns the instant this identifier encodes, truncated to milliseconds.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for TimestampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp.timestamp_millis())
    }
}

impl FromStr for TimestampId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidInput(format!(
                "Invalid timestamp id format: '{}'",
                s
            )));
        }
        let millis: i64 = s.parse().map_err(|e| {
            IdError::InvalidInput(format!("Invalid timestamp id '{}': {}", s, e))
        })?;
        let timestamp = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            IdError::InvalidInput(format!("Timestamp id out of range: '{}'", s))
        })?;
        Ok(Self { timestamp })
    }
}

/// Mints strictly increasing [`TimestampId`]s.
///
/// If the clock has not advanced past the previously issued instant, the next identifier is
/// the previous one plus one millisecond.
#[derive(Clone, Debug, Default)]
pub struct TimestampIdGenerator {
    last: Option<DateTime<Utc>>,
}

impl TimestampIdGenerator {
    /// Creates a generator that has not issued any identifier yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues an identifier for the current wall-clock instant.
    pub fn next(&mut self) -> TimestampId {
        self.next_at(Utc::now())
    }

    /// Issues an identifier for `now`, bumping past the previous one when needed.
    pub fn next_at(&mut self, now: DateTime<Utc>) -> TimestampId {
        let now = truncate_to_millis(now);
        let timestamp = match self.last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        self.last = Some(timestamp);
        TimestampId { timestamp }
    }

    /// Issues a [`RecordId`] for `now`.
    pub fn next_record_id_at(&mut self, now: DateTime<Utc>) -> RecordId {
        self.next_at(now).into()
    }
}

fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(instant.timestamp_millis())
        .single()
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).single().unwrap()
    }

    #[test]
    fn test_parse_accepts_seed_style_ids() {
        let id = RecordId::parse("1").unwrap();
        assert_eq!(id.as_str(), "1");
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(RecordId::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_whitespace() {
        match RecordId::parse("10 1") {
            Err(IdError::InvalidInput(msg)) => assert!(msg.contains("whitespace")),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_timestamp_id_display_is_epoch_millis() {
        let mut generator = TimestampIdGenerator::new();
        let id = generator.next_at(instant(1_705_762_800_123));
        assert_eq!(id.to_string(), "1705762800123");
    }

    #[test]
    fn test_generator_is_monotonic_same_instant() {
        let mut generator = TimestampIdGenerator::new();
        let now = instant(1_705_762_800_000);
        let first = generator.next_at(now);
        let second = generator.next_at(now);
        let third = generator.next_at(now);

        assert!(second.timestamp() > first.timestamp());
        assert!(third.timestamp() > second.timestamp());
        assert_ne!(RecordId::from(first), RecordId::from(second));
    }

    #[test]
    fn test_generator_handles_clock_going_backwards() {
        let mut generator = TimestampIdGenerator::new();
        let first = generator.next_at(instant(2_000));
        let second = generator.next_at(instant(1_000));
        assert_eq!(second.timestamp(), first.timestamp() + Duration::milliseconds(1));
    }

    #[test]
    fn test_generator_truncates_sub_millisecond_precision() {
        let mut generator = TimestampIdGenerator::new();
        let precise = instant(5_000) + Duration::microseconds(700);
        let id = generator.next_at(precise);
        assert_eq!(id.timestamp(), instant(5_000));
    }

    #[test]
    fn test_timestamp_id_round_trip() {
        let parsed = TimestampId::from_str("1705762800123").unwrap();
        assert_eq!(parsed.to_string(), "1705762800123");
    }

    #[test]
    fn test_timestamp_id_rejects_non_digits() {
        match TimestampId::from_str("17057x") {
            Err(IdError::InvalidInput(msg)) => assert!(msg.contains("Invalid timestamp id format")),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_id_serde_is_plain_string() {
        let id = RecordId::parse("42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"42\"");

        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: Result<RecordId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
