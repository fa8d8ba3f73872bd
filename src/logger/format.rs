//! Access log format module
//!
//! Supported formats:
//! - `simple` (`METHOD /path content-type`, one line per served file)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::AccessLogFormat;

/// Access log entry for one answered request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client address
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    pub method: String,
    /// Request path as received
    pub path: String,
    /// HTTP version (1.0, 1.1)
    pub http_version: String,
    pub status: u16,
    /// Content-Type sent with the response, if any
    pub content_type: Option<String>,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            http_version: "1.1".to_string(),
            status: 200,
            content_type: None,
            body_bytes: 0,
            request_time_us: 0,
        }
    }

    pub fn format(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Simple => self.format_simple(),
            AccessLogFormat::Common => self.format_common(),
            AccessLogFormat::Json => self.format_json(),
        }
    }

    /// `GET /index.html text/html`, status appended when it is not 200
    fn format_simple(&self) -> String {
        let mut line = format!("{} {}", self.method, self.path);
        if let Some(ct) = &self.content_type {
            line.push(' ');
            line.push_str(ct);
        }
        if self.status != 200 {
            line.push_str(&format!(" {}", self.status));
        }
        line
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}
