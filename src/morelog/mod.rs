//! More log: structured event logging for stub expansion.
//!
//! Every batch request the expander issues, the outcome of each expansion, and
//! every non-success response the HTTP client sees are reported as a
//! [`LogEntry`] to the session's [`MoreLogger`], which fans it out to any
//! number of [`LogSink`]s.
//!
//! | Source | Level | Event |
//! |--------|-------|-------|
//! | `expand:flat`, `expand:tree` | debug | one batch request |
//! | `expand` | info / error | expansion finished / failed |
//! | `client` | warn | non-success HTTP status |

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Emitting component (e.g. "expand:tree", "client").
    pub source: String,
    /// Fullname of the thread the entry concerns, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl LogEntry {
    pub fn new(level: LogLevel, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            source: source.into(),
            link_id: None,
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_link(mut self, link_id: impl Into<String>) -> Self {
        self.link_id = Some(link_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Single-line rendering: `<ts> <LEVEL> <source> [link] <message>`.
    pub fn format_line(&self) -> String {
        let ts = self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let link = self
            .link_id
            .as_deref()
            .map(|l| format!(" [{l}]"))
            .unwrap_or_default();
        format!("{ts} {} {}{link} {}", self.level, self.source, self.message)
    }
}

/// Output target for log entries. Must be usable from concurrent branches.
pub trait LogSink: Send + Sync {
    fn write(&self, entry: &LogEntry);
}

/// Dispatches entries at or above `min_level` to every attached sink.
pub struct MoreLogger {
    sinks: Vec<Arc<dyn LogSink>>,
    min_level: LogLevel,
}

impl MoreLogger {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Arc<dyn LogSink>) {
        self.sinks.push(sink);
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        !self.sinks.is_empty() && level >= self.min_level
    }

    pub fn log(&self, entry: &LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }
        for sink in &self.sinks {
            sink.write(entry);
        }
    }

    pub fn info(&self, source: &str, message: &str) {
        self.log(&LogEntry::new(LogLevel::Info, source, message));
    }

    pub fn error(&self, source: &str, message: &str) {
        self.log(&LogEntry::new(LogLevel::Error, source, message));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for MoreLogger {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Sinks ─────────────────────────────────────────────────────────────────

/// Keeps entries in memory for inspection in tests.
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Entries emitted by a single source, in order.
    pub fn from_source(&self, source: &str) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.source == source)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}
