//! Path resolution for provena data files.
//!
//! All adapters resolve the same locations through this module:
//!
//! - `data_root()` - directory holding every profile database
//! - `database_path(profile)` - `SQLite` file of one profile

mod database;
mod error;

pub use database::{
    DEFAULT_PROFILE, data_root, database_path, database_path_in, validate_profile_name,
};
pub use error::PathError;
