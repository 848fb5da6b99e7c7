//! User domain types.

use serde::{Deserialize, Serialize};

use crate::ports::RepositoryError;

/// A user known to the backend.
///
/// `email` is the natural key and is always stored normalized
/// (see [`normalize_email`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
}

impl User {
    /// Full name as "First Last", skipping empty parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
}

impl NewUser {
    /// A user with only an email set.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }
}

/// Normalize an email address.
///
/// Surrounding whitespace is trimmed and the domain part is lower-cased.
/// The local part is kept as-is since it may be case sensitive.
pub fn normalize_email(email: &str) -> Result<String, RepositoryError> {
    let trimmed = email.trim();
    let (local, domain) = trimmed
        .rsplit_once('@')
        .ok_or_else(|| RepositoryError::Validation(format!("invalid email `{trimmed}`")))?;

    if local.is_empty() || domain.is_empty() {
        return Err(RepositoryError::Validation(format!(
            "invalid email `{trimmed}`"
        )));
    }

    Ok(format!("{local}@{}", domain.to_lowercase()))
}
