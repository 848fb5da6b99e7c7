//! Collection implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_authinfo_collection;
mod sqlite_computer_collection;
mod sqlite_log_collection;
mod sqlite_query_manager;
mod sqlite_user_collection;

pub use sqlite_authinfo_collection::SqliteAuthInfoCollection;
pub use sqlite_computer_collection::SqliteComputerCollection;
pub use sqlite_log_collection::SqliteLogCollection;
pub use sqlite_query_manager::SqliteQueryManager;
pub use sqlite_user_collection::SqliteUserCollection;
