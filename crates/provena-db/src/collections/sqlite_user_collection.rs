//! `SQLite` implementation of the `UserCollection` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;

use provena_core::{BackendHandle, NewUser, RepositoryError, User, UserCollection, normalize_email};

use super::row_mappers::map_sqlx_error;

/// `SQLite` implementation of the `UserCollection` trait.
pub struct SqliteUserCollection {
    pool: SqlitePool,
    backend: BackendHandle,
}

impl SqliteUserCollection {
    /// Create a new `SQLite` user collection.
    pub const fn new(pool: SqlitePool, backend: BackendHandle) -> Self {
        Self { pool, backend }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    first_name: String,
    last_name: String,
    institution: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            institution: row.institution,
        }
    }
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, institution";

#[async_trait]
impl UserCollection for SqliteUserCollection {
    fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let email = normalize_email(&user.email)?;

        let result = sqlx::query(
            "INSERT INTO users (email, first_name, last_name, institution) VALUES (?, ?, ?, ?)",
        )
        .bind(&email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.institution)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("user with email {email}")))?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "user"))?
            .map(User::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("user id={id}")))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        let email = normalize_email(email)?;

        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(&email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "user"))?
        .map(User::from)
        .ok_or_else(|| RepositoryError::NotFound(format!("user email={email}")))
    }

    async fn get_or_create(&self, email: &str) -> Result<(User, bool), RepositoryError> {
        match self.get_by_email(email).await {
            Ok(user) => return Ok((user, false)),
            Err(RepositoryError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match self.create(NewUser::with_email(email)).await {
            Ok(user) => Ok((user, true)),
            // Lost a race with a concurrent insert of the same email.
            Err(RepositoryError::AlreadyExists(_)) => {
                Ok((self.get_by_email(email).await?, false))
            }
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY email"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "user"))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let email = normalize_email(&user.email)?;

        let result = sqlx::query(
            "UPDATE users SET email = ?, first_name = ?, last_name = ?, institution = ? WHERE id = ?",
        )
        .bind(&email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.institution)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("user with email {email}")))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user id={}", user.id)));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        // Verify user exists
        let user = self.get_by_id(id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "user"))?;

        let removed = sqlx::query("DELETE FROM authinfos WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?
            .rows_affected();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "user"))?;

        tx.commit().await.map_err(|e| map_sqlx_error(e, "user"))?;

        debug!(email = %user.email, removed, "deleted user and its auth-infos");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestDb;
    use provena_core::{NewAuthInfo, NewComputer};

    #[tokio::test]
    async fn test_create_normalizes_and_rejects_duplicates() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();

        let user = backend
            .users()
            .create(NewUser {
                email: "Jane@Example.ORG".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                institution: "EPFL".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(user.email, "Jane@example.org");
        assert_eq!(user.full_name(), "Jane Doe");

        let dup = backend
            .users()
            .create(NewUser::with_email("Jane@EXAMPLE.org"))
            .await;
        assert!(matches!(dup, Err(RepositoryError::AlreadyExists(_))));

        let invalid = backend.users().create(NewUser::with_email("nope")).await;
        assert!(matches!(invalid, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_or_create() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();

        let (first, created) = backend
            .users()
            .get_or_create("ops@lab.org")
            .await
            .unwrap();
        assert!(created);

        let (second, created) = backend
            .users()
            .get_or_create("ops@LAB.org")
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_list_update_and_not_found() {
        let db = TestDb::new().await.unwrap();
        let users = db.backend().users().clone();

        users.create(NewUser::with_email("b@x.org")).await.unwrap();
        let mut a = users.create(NewUser::with_email("a@x.org")).await.unwrap();

        let emails: Vec<_> = users
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["a@x.org", "b@x.org"]);

        a.institution = "CSCS".to_string();
        users.update(&a).await.unwrap();
        assert_eq!(users.get_by_id(a.id).await.unwrap().institution, "CSCS");

        a.email = "b@x.org".to_string();
        assert!(matches!(
            users.update(&a).await,
            Err(RepositoryError::AlreadyExists(_))
        ));

        let ghost = User { id: 999, ..a };
        assert!(matches!(
            users.update(&ghost).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            users.get_by_email("c@x.org").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_authinfos() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();

        let user = backend
            .users()
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();
        let computer = backend
            .computers()
            .create(NewComputer::new("laptop", "localhost", "core.local", "core.direct"))
            .await
            .unwrap();
        backend
            .authinfos()
            .create(NewAuthInfo::new(user.id, computer.id))
            .await
            .unwrap();

        backend.users().delete(user.id).await.unwrap();

        assert!(backend.authinfos().list_for_computer(computer.id).await.unwrap().is_empty());
        assert!(matches!(
            backend.users().delete(user.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_authinfos() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();

        let user = backend
            .users()
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();
        for label in ["laptop", "daint"] {
            let computer = backend
                .computers()
                .create(NewComputer::new(label, "localhost", "core.local", "core.direct"))
                .await
                .unwrap();
            backend
                .authinfos()
                .create(NewAuthInfo::new(user.id, computer.id))
                .await
                .unwrap();
        }

        sqlx::query(
            "CREATE TRIGGER block_user_delete BEFORE DELETE ON users \
             BEGIN SELECT RAISE(ABORT, 'user rows are locked'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = backend.users().delete(user.id).await;
        assert!(matches!(result, Err(RepositoryError::Storage(msg)) if msg.contains("locked")));

        assert_eq!(backend.users().get_by_id(user.id).await.unwrap(), user);
        assert_eq!(backend.authinfos().list_for_user(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_outlives_backend() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();
        let users = backend.users().clone();
        let user = users
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();
        drop(backend);

        assert!(!users.backend().is_bound());
        assert_eq!(users.get_by_id(user.id).await.unwrap(), user);
        users.delete(user.id).await.unwrap();
        assert!(matches!(
            users.get_by_id(user.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }
}
