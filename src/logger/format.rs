//! Access log format module
//!
//! Supports multiple log formats:
//! - `plain` (status, error if any, duration, remote address, method, path)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address (ip:port)
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (PUT, GET, ...)
    pub method: String,
    /// Escaped request path as received on the wire
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// Response status code
    pub status: u16,
    /// Request processing time in microseconds
    pub duration_us: u64,
    /// Error message when the handler failed
    pub error: Option<String>,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            status: 200,
            duration_us: 0,
            error: None,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "plain" => self.format_plain(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// One line per request:
    /// `$status($error) $duration $remote_addr $method $path`
    fn format_plain(&self) -> String {
        let duration = format_duration(self.duration_us);
        match &self.error {
            Some(error) => format!(
                "{}({}) {} {} {} {}",
                self.status, error, duration, self.remote_addr, self.method, self.path
            ),
            None => format!(
                "{} {} {} {} {}",
                self.status, duration, self.remote_addr, self.method, self.path
            ),
        }
    }

    /// JSON structured format
    fn format_json(&self) -> String {
        serde_json::json!({
            "time": self.time.to_rfc3339(),
            "remote_addr": self.remote_addr.clone(),
            "method": self.method.clone(),
            "path": self.path.clone(),
            "query": self.query.clone(),
            "status": self.status,
            "duration_us": self.duration_us,
            "error": self.error.clone(),
        })
        .to_string()
    }

    /// Custom format with variable substitution
    fn format_custom(&self, pattern: &str) -> String {
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace(
                "$time_local",
                &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
            )
            .replace("$method", &self.method)
            .replace("$path", &self.path)
            .replace("$query", self.query.as_deref().unwrap_or(""))
            .replace("$status", &self.status.to_string())
            .replace("$duration_us", &self.duration_us.to_string())
            .replace("$error", self.error.as_deref().unwrap_or("-"))
    }
}

/// Human-readable duration from microseconds
fn format_duration(duration_us: u64) -> String {
    if duration_us < 1_000 {
        format!("{duration_us}\u{b5}s")
    } else if duration_us < 1_000_000 {
        #[allow(clippy::cast_precision_loss)]
        let ms = duration_us as f64 / 1_000.0;
        format!("{ms:.3}ms")
    } else {
        #[allow(clippy::cast_precision_loss)]
        let s = duration_us as f64 / 1_000_000.0;
        format!("{s:.3}s")
    }
}
