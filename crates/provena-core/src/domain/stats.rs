//! Aggregates returned by the query manager.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Computer, LogLevel};

/// Number of stored rows per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub users: i64,
    pub computers: i64,
    pub authinfos: i64,
    pub logs: i64,
}

/// Creation statistics for log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogStatistics {
    pub total: i64,
    pub by_level: BTreeMap<LogLevel, i64>,
    /// Keyed by UTC day, `YYYY-MM-DD`.
    pub by_day: BTreeMap<String, i64>,
}

/// A computer together with the state of a user's auth-info on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredComputer {
    pub computer: Computer,
    pub enabled: bool,
}
