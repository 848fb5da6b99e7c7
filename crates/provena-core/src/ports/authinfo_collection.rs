//! Auth-info collection trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::backend::BackendHandle;
use crate::domain::{Attributes, AuthInfo, NewAuthInfo};

/// Collection of auth-infos.
///
/// # Design Rules
///
/// - At most one auth-info per (user, computer) pair
/// - The referenced user and computer are resolved through the sibling
///   collections of the same backend, never by direct table access
#[async_trait]
pub trait AuthInfoCollection: Send + Sync {
    /// Handle to the facade this collection belongs to.
    fn backend(&self) -> &BackendHandle;

    /// Configure a computer for a user.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user or the computer does not exist
    /// - `AlreadyExists` if the pair is already configured
    async fn create(&self, authinfo: NewAuthInfo) -> Result<AuthInfo, RepositoryError>;

    /// Get the auth-info of `user_id` on `computer_id`.
    async fn get(&self, computer_id: i64, user_id: i64) -> Result<AuthInfo, RepositoryError>;

    async fn get_by_id(&self, id: i64) -> Result<AuthInfo, RepositoryError>;

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AuthInfo>, RepositoryError>;

    async fn list_for_computer(&self, computer_id: i64)
    -> Result<Vec<AuthInfo>, RepositoryError>;

    /// Enable or disable an auth-info.
    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<(), RepositoryError>;

    /// Replace the transport parameters of an auth-info in place.
    ///
    /// The id, the enabled flag and the metadata are kept.
    async fn update_auth_params(
        &self,
        id: i64,
        auth_params: Attributes,
    ) -> Result<(), RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Delete every auth-info of a computer. Returns the number removed.
    async fn delete_for_computer(&self, computer_id: i64) -> Result<u64, RepositoryError>;

    /// Delete every auth-info of a user. Returns the number removed.
    async fn delete_for_user(&self, user_id: i64) -> Result<u64, RepositoryError>;
}
