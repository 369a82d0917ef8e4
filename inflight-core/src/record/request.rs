use crate::record::fields::*;
use crate::row::Row;
use chrono::{DateTime, FixedOffset, TimeDelta};

/// Millisecond precision, in the request's own UTC offset.
pub const STARTED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One decoded access log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub started_at: DateTime<FixedOffset>,
    /// Never below one millisecond once decoded from a log line.
    pub duration: TimeDelta,
    pub status: u16,
    /// JSON rendering of the request target, see [`crate::record::encode_url`].
    pub url: String,
    pub content_length: u32,
    pub ip: String,
    pub user: String,
    pub method: String,
    pub protocol: String,
    pub referrer: String,
    pub request_id: String,
    pub user_agent: String,
}

impl RequestRecord {
    pub fn duration_millis(&self) -> i64 {
        self.duration.num_milliseconds()
    }

    pub fn started_at_millis(&self) -> i64 {
        self.started_at.timestamp_millis()
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.put(STARTED_AT, self.started_at.format(STARTED_AT_FORMAT).to_string());
        row.put(DURATION, self.duration_millis().to_string());
        row.put(STATUS, self.status.to_string());
        row.put(URL, self.url.as_str());
        row.put(CONTENT_LENGTH, self.content_length.to_string());
        row.put(IP, self.ip.as_str());
        row.put(USER, self.user.as_str());
        row.put(METHOD, self.method.as_str());
        row.put(PROTOCOL, self.protocol.as_str());
        row.put(REFERRER, self.referrer.as_str());
        row.put(REQUEST_ID, self.request_id.as_str());
        row.put(USER_AGENT, self.user_agent.as_str());
        row
    }

}
