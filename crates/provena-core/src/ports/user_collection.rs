//! User collection trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::backend::BackendHandle;
use crate::domain::{NewUser, User};

/// Collection of users.
///
/// # Design Rules
///
/// - Emails are normalized before any lookup or write
/// - Email is unique across users
/// - Deleting a user also removes its auth-infos
#[async_trait]
pub trait UserCollection: Send + Sync {
    /// Handle to the facade this collection belongs to.
    fn backend(&self) -> &BackendHandle;

    /// Create a new user.
    ///
    /// Returns `AlreadyExists` if the normalized email is taken and
    /// `Validation` if the email is malformed.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Get a user by database ID.
    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError>;

    /// Get a user by email (normalized before lookup).
    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError>;

    /// Get the user with `email`, creating it when missing.
    ///
    /// The boolean is `true` when the user was created by this call.
    async fn get_or_create(&self, email: &str) -> Result<(User, bool), RepositoryError>;

    /// List all users ordered by email.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Update names, institution and email of an existing user.
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    /// Delete a user and its auth-infos.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
