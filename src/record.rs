//! Log records and severity levels
//!
//! A `LogRecord` is the handler-facing input shape: channel, severity,
//! message, structured context, capture time, and the prerendered line the
//! mirror path echoes. Severities use the 100..600 scale so integer codes
//! stored in the level column sort by urgency.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Log severity on the 100..600 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Level {
    /// Numeric severity code stored in the level column
    pub fn code(&self) -> i64 {
        match self {
            Level::Debug => 100,
            Level::Info => 200,
            Level::Notice => 250,
            Level::Warning => 300,
            Level::Error => 400,
            Level::Critical => 500,
            Level::Alert => 550,
            Level::Emergency => 600,
        }
    }

    /// Uppercase name stored in the level-name column
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
            Level::Emergency => "EMERGENCY",
        }
    }

    /// Get all levels in ascending severity order
    pub fn all() -> &'static [Level] {
        &[
            Level::Debug,
            Level::Info,
            Level::Notice,
            Level::Warning,
            Level::Error,
            Level::Critical,
            Level::Alert,
            Level::Emergency,
        ]
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "NOTICE" => Ok(Level::Notice),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            "ALERT" => Ok(Level::Alert),
            "EMERGENCY" => Ok(Level::Emergency),
            _ => Err(Error::Metadata(format!("Unknown log level: {}", s))),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One log event as handed to the persistence handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Logical source of the event
    pub channel: String,
    /// Numeric severity code
    pub level: i64,
    /// Severity name matching the code
    pub level_name: String,
    /// Human-readable message
    pub message: String,
    /// Structured context attached by the caller
    pub context: serde_json::Map<String, serde_json::Value>,
    /// Capture time in UTC
    pub datetime: DateTime<Utc>,
    /// Prerendered single- or multi-line text used by the mirror path
    pub formatted: String,
}

impl LogRecord {
    /// Create a record with the capture time set to now and the formatted
    /// line rendered in the default `[time] channel.LEVEL: message` shape
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        let channel = channel.into();
        let message = message.into();
        let datetime = Utc::now();
        let formatted = format!(
            "[{}] {}.{}: {}",
            datetime.format("%Y-%m-%d %H:%M:%S"),
            channel,
            level.as_str(),
            message
        );

        Self {
            channel,
            level: level.code(),
            level_name: level.as_str().to_string(),
            message,
            context: serde_json::Map::new(),
            datetime,
            formatted,
        }
    }

    /// Attach one context entry
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Override the capture time
    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }

    /// Override the prerendered text
    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = formatted.into();
        self
    }
}
