//! Log domain types.
//!
//! Log entries are emitted while workflow nodes run and are attached to the
//! node by its database id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Attributes;

/// Severity of a log entry.
///
/// Ordered by severity. `Report` sits between `Info` and `Warning` and is
/// used for messages a workflow wants surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Report,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [Self; 6] = [
        Self::Debug,
        Self::Info,
        Self::Report,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Numeric severity, compatible with the usual logging scale.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Report => 23,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    /// Stored name of the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Report => "REPORT",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a level name, ignoring case.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Levels at or above `self`.
    pub fn and_above(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |level| *level >= self)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown log level `{s}`"))
    }
}

/// A stored log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub uuid: Uuid,
    pub time: DateTime<Utc>,
    pub logger_name: String,
    pub level: LogLevel,
    /// Workflow node the entry belongs to.
    pub node_id: i64,
    pub message: String,
    pub metadata: Attributes,
}

/// Data for recording a new log entry.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    /// Defaults to the insertion time when `None`.
    pub time: Option<DateTime<Utc>>,
    pub logger_name: String,
    pub level: LogLevel,
    pub node_id: i64,
    pub message: String,
    pub metadata: Attributes,
}

impl NewLogEntry {
    pub fn new(
        logger_name: impl Into<String>,
        level: LogLevel,
        node_id: i64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            time: None,
            logger_name: logger_name.into(),
            level,
            node_id,
            message: message.into(),
            metadata: Attributes::new(),
        }
    }

    #[must_use]
    pub const fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }
}

/// Ordering of log queries by time (ties broken by id).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Filter for log queries.
///
/// Every `None` field leaves that dimension unconstrained. `order`, `limit`
/// and `offset` only apply to reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Exact level match.
    pub level: Option<LogLevel>,
    /// Minimum severity (inclusive).
    pub min_level: Option<LogLevel>,
    pub logger_name: Option<String>,
    pub node_id: Option<i64>,
    /// Inclusive lower bound on time.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on time.
    pub until: Option<DateTime<Utc>>,
    pub order: SortOrder,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LogFilter {
    /// Filter matching every entry of one node.
    #[must_use]
    pub fn for_node(node_id: i64) -> Self {
        Self {
            node_id: Some(node_id),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_follows_severity() {
        let mut sorted = LogLevel::ALL;
        sorted.sort_by_key(|l| l.severity());
        assert_eq!(sorted, LogLevel::ALL);
        assert!(LogLevel::Report > LogLevel::Info);
        assert!(LogLevel::Report < LogLevel::Warning);
    }

    #[test]
    fn test_level_parse_is_case_insensitive() {
        assert_eq!(LogLevel::parse("report"), Some(LogLevel::Report));
        assert_eq!("Warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_serializes_uppercase() {
        let json = serde_json::to_string(&LogLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    #[test]
    fn test_and_above() {
        let levels: Vec<_> = LogLevel::Warning.and_above().collect();
        assert_eq!(
            levels,
            vec![LogLevel::Warning, LogLevel::Error, LogLevel::Critical]
        );
    }
}
