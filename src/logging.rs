//! Structured logging for the insight engine
//!
//! Plain or JSON line output with level filtering, per-call structured
//! fields, and correlation IDs so one dashboard request can be traced across
//! fetch, compute, and render log lines. The engine is synchronous, so the
//! sink sits behind a plain `std::sync::Mutex`.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

/// Synchronous structured logger writing to a shared sink
#[derive(Clone)]
pub struct Logger {
    name: String,
    min_level: LogLevel,
    json_output: bool,
    correlation_id: Option<String>,
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Logger {
    /// Create a logger writing plain lines to stderr
    pub fn new<S: Into<String>>(name: S, min_level: LogLevel) -> Self {
        Self::with_sink(name, min_level, Box::new(io::stderr()))
    }

    /// Create a logger over an explicit sink
    pub fn with_sink<S: Into<String>>(
        name: S,
        min_level: LogLevel,
        sink: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            name: name.into(),
            min_level,
            json_output: false,
            correlation_id: None,
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Switch to JSON line output for log aggregators
    pub fn json(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    /// Derive a logger that stamps every entry with the given correlation ID
    pub fn with_correlation_id<S: Into<String>>(&self, correlation_id: S) -> Self {
        let mut logger = self.clone();
        logger.correlation_id = Some(correlation_id.into());
        logger
    }

    /// Generate a fresh correlation ID for one dashboard request
    pub fn new_correlation_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Check whether a level would currently be emitted
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Log a message at the given level
    pub fn log<S: Into<String>>(&self, level: LogLevel, message: S) {
        self.log_with_fields(level, message, HashMap::new());
    }

    /// Log a message with additional structured fields
    pub fn log_with_fields<S: Into<String>>(
        &self,
        level: LogLevel,
        message: S,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            logger: self.name.clone(),
            correlation_id: self.correlation_id.clone(),
            fields,
        };

        let line = if self.json_output {
            match serde_json::to_string(&entry) {
                Ok(json) => json,
                Err(_) => return,
            }
        } else {
            format_plain(&entry)
        };

        // Logging is best-effort; a full or closed sink must not take the
        // engine down with it
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}", line);
        }
    }

    /// Log at trace level
    pub fn trace<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Trace, message);
    }

    /// Log at debug level
    pub fn debug<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Debug, message);
    }

    /// Log at info level
    pub fn info<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Info, message);
    }

    /// Log at warn level
    pub fn warn<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Warn, message);
    }

    /// Log at error level
    pub fn error<S: Into<String>>(&self, message: S) {
        self.log(LogLevel::Error, message);
    }
}

fn format_plain(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} [{}] {}: {}",
        entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
        entry.level.as_str(),
        entry.logger,
        entry.message
    );

    if let Some(correlation_id) = &entry.correlation_id {
        line.push_str(&format!(" correlation_id={}", correlation_id));
    }

    let mut keys: Vec<&String> = entry.fields.keys().collect();
    keys.sort();
    for key in keys {
        line.push_str(&format!(" {}={}", key, entry.fields[key]));
    }

    line
}
