//! `SQLite` implementation of the `AuthInfoCollection` trait.
//!
//! Transport parameters are stored base64-encoded (not encryption - a
//! follow-up should add proper at-rest protection for credentials).

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use provena_core::{
    Attributes, AuthInfo, AuthInfoCollection, BackendHandle, NewAuthInfo, RepositoryError,
};

use super::row_mappers::{
    attributes_from_json, attributes_to_json, decode_attributes, encode_attributes,
    map_sqlx_error,
};

/// `SQLite` implementation of the `AuthInfoCollection` trait.
pub struct SqliteAuthInfoCollection {
    pool: SqlitePool,
    backend: BackendHandle,
}

impl SqliteAuthInfoCollection {
    /// Create a new `SQLite` auth-info collection.
    pub const fn new(pool: SqlitePool, backend: BackendHandle) -> Self {
        Self { pool, backend }
    }

    async fn fetch_where(
        &self,
        condition: &str,
        value: i64,
    ) -> Result<Vec<AuthInfo>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuthInfoRow>(&format!(
            "SELECT {AUTHINFO_COLUMNS} FROM authinfos WHERE {condition} = ? ORDER BY id"
        ))
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        rows.into_iter().map(row_to_authinfo).collect()
    }

    /// Human-readable name of a (computer, user) pair for error messages.
    ///
    /// Falls back to raw ids when the backend or either entity is gone.
    async fn describe_pair(&self, computer_id: i64, user_id: i64) -> String {
        let Some(backend) = self.backend.get() else {
            return format!("computer id={computer_id} user id={user_id}");
        };
        let computer = backend
            .computers()
            .get_by_id(computer_id)
            .await
            .map_or_else(|_| format!("id={computer_id}"), |c| format!("`{}`", c.label));
        let user = backend
            .users()
            .get_by_id(user_id)
            .await
            .map_or_else(|_| format!("id={user_id}"), |u| u.email);
        format!("computer {computer} for user {user}")
    }
}

#[derive(sqlx::FromRow)]
struct AuthInfoRow {
    id: i64,
    user_id: i64,
    computer_id: i64,
    enabled: bool,
    auth_params: String,
    metadata: String,
}

const AUTHINFO_COLUMNS: &str = "id, user_id, computer_id, enabled, auth_params, metadata";

fn row_to_authinfo(row: AuthInfoRow) -> Result<AuthInfo, RepositoryError> {
    Ok(AuthInfo {
        id: row.id,
        user_id: row.user_id,
        computer_id: row.computer_id,
        enabled: row.enabled,
        auth_params: decode_attributes(&row.auth_params)?,
        metadata: attributes_from_json(&row.metadata)?,
    })
}

#[async_trait]
impl AuthInfoCollection for SqliteAuthInfoCollection {
    fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    async fn create(&self, authinfo: NewAuthInfo) -> Result<AuthInfo, RepositoryError> {
        let backend = self.backend.require()?;
        let user = backend.users().get_by_id(authinfo.user_id).await?;
        let computer = backend.computers().get_by_id(authinfo.computer_id).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO authinfos (user_id, computer_id, enabled, auth_params, metadata)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(computer.id)
        .bind(authinfo.enabled)
        .bind(encode_attributes(&authinfo.auth_params)?)
        .bind(attributes_to_json(&authinfo.metadata)?)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_sqlx_error(
                e,
                &format!(
                    "computer `{}` is already configured for {}",
                    computer.label, user.email
                ),
            )
        })?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get(&self, computer_id: i64, user_id: i64) -> Result<AuthInfo, RepositoryError> {
        let row = sqlx::query_as::<_, AuthInfoRow>(&format!(
            "SELECT {AUTHINFO_COLUMNS} FROM authinfos WHERE computer_id = ? AND user_id = ?"
        ))
        .bind(computer_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        match row {
            Some(row) => row_to_authinfo(row),
            None => Err(RepositoryError::NotFound(format!(
                "no authinfo for {}",
                self.describe_pair(computer_id, user_id).await
            ))),
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<AuthInfo, RepositoryError> {
        let row = sqlx::query_as::<_, AuthInfoRow>(&format!(
            "SELECT {AUTHINFO_COLUMNS} FROM authinfos WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "authinfo"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("authinfo id={id}")))?;

        row_to_authinfo(row)
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AuthInfo>, RepositoryError> {
        self.fetch_where("user_id", user_id).await
    }

    async fn list_for_computer(
        &self,
        computer_id: i64,
    ) -> Result<Vec<AuthInfo>, RepositoryError> {
        self.fetch_where("computer_id", computer_id).await
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE authinfos SET enabled = ? WHERE id = ?")
            .bind(enabled)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("authinfo id={id}")));
        }

        Ok(())
    }

    async fn update_auth_params(
        &self,
        id: i64,
        auth_params: Attributes,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE authinfos SET auth_params = ? WHERE id = ?")
            .bind(encode_attributes(&auth_params)?)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("authinfo id={id}")));
        }

        debug!(id, "replaced auth params");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM authinfos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("authinfo id={id}")));
        }

        Ok(())
    }

    async fn delete_for_computer(&self, computer_id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM authinfos WHERE computer_id = ?")
            .bind(computer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        debug!(computer_id, removed = result.rows_affected(), "deleted auth-infos");
        Ok(result.rows_affected())
    }

    async fn delete_for_user(&self, user_id: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM authinfos WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?;

        debug!(user_id, removed = result.rows_affected(), "deleted auth-infos");
        Ok(result.rows_affected())
    }
}
