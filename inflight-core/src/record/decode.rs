//! Decoding of `[http]` access log lines.
//!
//! Example line (one line, wrapped here):
//!
//! ```text
//! [http] 2016/01/03 23:39:23 172.17.0.13 - admin [03/Jan/2016:23:39:22 +0000]
//!   GET /query?db=sphere&q=select+1 HTTP/1.1 200 365 https://grafana.example.com/
//!   Mozilla/5.0 (X11; Linux x86_64) 377d9379-b273-11e5-bdcd-000000000000 892.850592ms
//! ```
//!
//! The first timestamp is when the entry was logged (the end of the request,
//! whole seconds). The bracketed one is when the request started, also whole
//! seconds. Start times are nudged towards the midpoint of the window the two
//! timestamps leave open, see [`adjust_start`].

use crate::duration::{DurationError, parse_duration};
use crate::record::request::RequestRecord;
use crate::record::url_json::encode_url;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Timelike, Utc};
use std::num::ParseIntError;
use thiserror::Error;

const LINE_PREFIX: &str = "[http]";
const MIN_TOKENS: usize = 17;
const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.f";
const REQUEST_TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not an http request line")]
    NotRequestLine,

    #[error("malformed request line: expected at least 17 fields, found {found}")]
    MalformedFields { found: usize },

    #[error("invalid log timestamp '{value}': {source}")]
    LogTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid request timestamp '{value}': {source}")]
    RequestTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid url '{value}': {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid status '{value}': {source}")]
    Status {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid content length '{value}': {source}")]
    ContentLength {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid duration: {0}")]
    Duration(#[from] DurationError),
}

impl DecodeError {
    /// Lines that are simply not request entries. Reported nowhere.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::NotRequestLine | Self::MalformedFields { .. })
    }
}

pub fn parse_log_line(line: &str) -> Result<RequestRecord, DecodeError> {
    if !line.starts_with(LINE_PREFIX) {
        return Err(DecodeError::NotRequestLine);
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    let n = tokens.len();
    if n < MIN_TOKENS {
        return Err(DecodeError::MalformedFields { found: n });
    }

    let logged = format!("{} {}", tokens[1], tokens[2]);
    let logged_at = NaiveDateTime::parse_from_str(&logged, LOG_TIMESTAMP_FORMAT)
        .map_err(|source| DecodeError::LogTimestamp {
            value: logged.clone(),
            source,
        })?
        .and_utc();

    let requested = format!("{} {}", tokens[6], tokens[7]);
    let requested = requested.trim_matches(|c| c == '[' || c == ']');
    let started_at = DateTime::parse_from_str(requested, REQUEST_TIMESTAMP_FORMAT).map_err(
        |source| DecodeError::RequestTimestamp {
            value: requested.to_string(),
            source,
        },
    )?;

    let url = encode_url(tokens[9]).map_err(|source| DecodeError::Url {
        value: tokens[9].to_string(),
        source,
    })?;

    let status = tokens[11]
        .parse::<u16>()
        .map_err(|source| DecodeError::Status {
            value: tokens[11].to_string(),
            source,
        })?;
    let content_length = tokens[12]
        .parse::<u32>()
        .map_err(|source| DecodeError::ContentLength {
            value: tokens[12].to_string(),
            source,
        })?;

    let duration = parse_duration(tokens[n - 1])?.max(TimeDelta::milliseconds(1));

    Ok(RequestRecord {
        started_at: adjust_start(started_at, logged_at, duration),
        duration,
        status,
        url,
        content_length,
        ip: tokens[3].to_string(),
        user: tokens[5].to_string(),
        method: tokens[8].to_string(),
        protocol: tokens[10].to_string(),
        referrer: tokens[13].to_string(),
        request_id: tokens[n - 2].to_string(),
        user_agent: tokens[14..n - 2].join(" "),
    })
}

/// Moves `started` forward by half the slack between the logged window and
/// the reported duration, slack capped at 999ms.
///
/// Both timestamps are truncated to whole seconds; the request really ended
/// somewhere in `[logged, logged + 999ms]`.
pub fn adjust_start(
    started: DateTime<FixedOffset>,
    logged: DateTime<Utc>,
    duration: TimeDelta,
) -> DateTime<FixedOffset> {
    let ended = round_to_second(logged) + TimeDelta::milliseconds(999);
    let slack = (ended - started.with_timezone(&Utc) - duration).min(TimeDelta::milliseconds(999));
    if slack > TimeDelta::zero() {
        started + slack / 2
    } else {
        started
    }
}

fn round_to_second(t: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = i64::from(t.nanosecond());
    let truncated = t - TimeDelta::nanoseconds(nanos);
    if nanos >= 500_000_000 {
        truncated + TimeDelta::seconds(1)
    } else {
        truncated
    }
}
