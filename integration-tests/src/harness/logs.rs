/// One request as the proxy would log it.
#[derive(Debug, Clone)]
pub struct LoggedRequest {
    pub id: String,
    /// Seconds since 2016-01-03 00:00:00 UTC.
    pub start_s: u32,
    /// At least one second, so the logged time never pushes the start
    /// forward.
    pub duration_ms: u32,
}

impl LoggedRequest {
    pub fn new(id: &str, start_s: u32, duration_ms: u32) -> Self {
        Self {
            id: id.to_string(),
            start_s,
            duration_ms,
        }
    }

    /// Epoch milliseconds the analyser derives for the start.
    pub fn start_ms(&self) -> i64 {
        BASE_MS + i64::from(self.start_s) * 1_000
    }

    pub fn end_ms(&self) -> i64 {
        self.start_ms() + i64::from(self.duration_ms)
    }
}

/// 2016-01-03 00:00:00 UTC.
const BASE_MS: i64 = 1_451_779_200_000;

fn clock(total_s: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_s / 3_600,
        total_s / 60 % 60,
        total_s % 60
    )
}

/// Formats `request` as a proxy log line.
///
/// The line is logged one second before the whole second the request ends
/// in, which leaves no slack between logged end and duration.
pub fn log_line(request: &LoggedRequest) -> String {
    let logged_s = request.start_s + request.duration_ms / 1_000 - 1;
    format!(
        "[http] 2016/01/03 {} 10.0.0.1 - alice [03/Jan/2016:{} +0000] \
         GET /query?db=fleet&q=select HTTP/1.1 200 42 - curl/7.47.0 {} {}ms",
        clock(logged_s),
        clock(request.start_s),
        request.id,
        request.duration_ms
    )
}
