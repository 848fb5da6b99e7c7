//! Auth-info domain types.
//!
//! An auth-info ties one user to one computer and carries the parameters
//! the transport needs to connect on that user's behalf.

use serde::{Deserialize, Serialize};

use super::Attributes;

/// Credentials and connection parameters of a user on a computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub id: i64,
    pub user_id: i64,
    pub computer_id: i64,
    pub enabled: bool,
    /// Transport parameters (username, key file, proxy command...).
    pub auth_params: Attributes,
    pub metadata: Attributes,
}

/// Data for configuring a computer for a user.
#[derive(Debug, Clone)]
pub struct NewAuthInfo {
    pub user_id: i64,
    pub computer_id: i64,
    pub enabled: bool,
    pub auth_params: Attributes,
    pub metadata: Attributes,
}

impl NewAuthInfo {
    /// An enabled auth-info with no parameters.
    pub fn new(user_id: i64, computer_id: i64) -> Self {
        Self {
            user_id,
            computer_id,
            enabled: true,
            auth_params: Attributes::new(),
            metadata: Attributes::new(),
        }
    }

    /// Set the transport parameters.
    #[must_use]
    pub fn with_auth_params(mut self, auth_params: Attributes) -> Self {
        self.auth_params = auth_params;
        self
    }
}
