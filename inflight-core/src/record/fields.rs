use crate::row::Header;

pub const STARTED_AT: &str = "startedAt";
pub const DURATION: &str = "duration";
pub const STATUS: &str = "status";
pub const URL: &str = "url";
pub const CONTENT_LENGTH: &str = "contentLength";
pub const IP: &str = "ip";
pub const USER: &str = "user";
pub const METHOD: &str = "method";
pub const PROTOCOL: &str = "protocol";
pub const REFERRER: &str = "referrer";
pub const REQUEST_ID: &str = "requestId";
pub const USER_AGENT: &str = "userAgent";

/// Column order of decoded request rows.
pub const CSV_HEADERS: [&str; 12] = [
    STARTED_AT,
    DURATION,
    STATUS,
    URL,
    CONTENT_LENGTH,
    IP,
    USER,
    METHOD,
    PROTOCOL,
    REFERRER,
    REQUEST_ID,
    USER_AGENT,
];

pub fn request_header() -> Header {
    Header::new(CSV_HEADERS)
}
