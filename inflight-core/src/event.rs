//! Start/end events derived from request rows.

use chrono::NaiveDateTime;
use std::fmt;

/// Sequence number shared by the two events of one request.
pub const ORDINAL: &str = "ordinal";
/// Epoch milliseconds of the event.
pub const UNIX: &str = "unix";
/// `start` or `end`.
pub const EVENT_TYPE: &str = "eventType";
/// Requests in flight when the event happened, excluding its own request.
pub const ACTIVE: &str = "active";
/// Request id of the longest running request at the event.
pub const OLDEST: &str = "oldest";

/// Fields added by the event splitter.
pub const EVENT_FIELDS: [&str; 3] = [ORDINAL, UNIX, EVENT_TYPE];
/// Fields added by the active interval counter.
pub const COUNTER_FIELDS: [&str; 2] = [ACTIVE, OLDEST];

const STARTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    End,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(EventKind::Start),
            "end" => Some(EventKind::End),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total order of events: timestamp first, ordinal breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    pub timestamp_ms: i64,
    pub ordinal: u64,
}

impl EventKey {
    pub fn new(timestamp_ms: i64, ordinal: u64) -> Self {
        Self {
            timestamp_ms,
            ordinal,
        }
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` (optionally with a fraction) as UTC epoch
/// milliseconds.
pub fn parse_started_at(s: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(s.trim(), STARTED_AT_FORMAT)
        .ok()
        .map(|t| t.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_at_accepts_whole_and_fractional_seconds() {
        assert_eq!(parse_started_at("1970-01-01 00:00:01"), Some(1_000));
        assert_eq!(parse_started_at("1970-01-01 00:00:01.250"), Some(1_250));
        assert_eq!(parse_started_at("01/Jan/1970"), None);
    }

    #[test]
    fn keys_order_by_timestamp_then_ordinal() {
        assert!(EventKey::new(5, 9) < EventKey::new(6, 1));
        assert!(EventKey::new(5, 1) < EventKey::new(5, 2));
    }
}
