//! Database path resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "default";

/// Get the root directory for provena data.
///
/// Resolution order:
/// 1. `PROVENA_DATA_DIR` environment variable
/// 2. System data directory (e.g. `~/.local/share/provena`)
pub fn data_root() -> Result<PathBuf, PathError> {
    resolve_data_root(env::var("PROVENA_DATA_DIR").ok().as_deref())
}

fn resolve_data_root(override_dir: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(path) = override_dir.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("provena"))
}

/// Check that a profile name is usable as a database file stem.
pub fn validate_profile_name(profile: &str) -> Result<(), PathError> {
    let valid = !profile.is_empty()
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PathError::InvalidProfile(profile.to_string()))
    }
}

/// Get the path to the database file of `profile`.
///
/// Returns `<data_root>/data/<profile>.db`. The `data/` subdirectory is
/// created if it doesn't exist.
pub fn database_path(profile: &str) -> Result<PathBuf, PathError> {
    validate_profile_name(profile)?;
    database_path_in(&data_root()?, profile)
}

/// Like [`database_path`], under an explicit data root.
pub fn database_path_in(root: &Path, profile: &str) -> Result<PathBuf, PathError> {
    validate_profile_name(profile)?;
    let data_dir = root.join("data");

    fs::create_dir_all(&data_dir).map_err(|e| PathError::CreateFailed {
        path: data_dir.clone(),
        reason: e.to_string(),
    })?;

    Ok(data_dir.join(format!("{profile}.db")))
}
