//! Core domain types.
//!
//! These types represent the stored entities independent of any
//! infrastructure concerns (database, filesystem, etc.).
//!
//! # Structure
//!
//! - `user` - Users and email normalization
//! - `computer` - Computers (compute resources) a workflow can run on
//! - `authinfo` - Per-user credentials for a computer
//! - `log` - Log entries attached to workflow nodes, plus filters
//! - `stats` - Aggregates produced by the query manager

mod authinfo;
mod computer;
mod log;
mod stats;
mod user;

pub use authinfo::{AuthInfo, NewAuthInfo};
pub use computer::{Computer, NewComputer};
pub use log::{LogEntry, LogFilter, LogLevel, NewLogEntry, SortOrder};
pub use stats::{ConfiguredComputer, EntityCounts, LogStatistics};
pub use user::{NewUser, User, normalize_email};

/// Free-form JSON attributes attached to an entity.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
