//! `SQLite` implementation of the `ComputerCollection` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use provena_core::{BackendHandle, Computer, ComputerCollection, NewComputer, RepositoryError};

use super::row_mappers::{attributes_from_json, attributes_to_json, map_sqlx_error};

/// `SQLite` implementation of the `ComputerCollection` trait.
pub struct SqliteComputerCollection {
    pool: SqlitePool,
    backend: BackendHandle,
}

impl SqliteComputerCollection {
    /// Create a new `SQLite` computer collection.
    pub const fn new(pool: SqlitePool, backend: BackendHandle) -> Self {
        Self { pool, backend }
    }

    async fn fetch_one(
        &self,
        column: &str,
        value: &str,
        key: &str,
    ) -> Result<Computer, RepositoryError> {
        let row = sqlx::query_as::<_, ComputerRow>(&format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers WHERE {column} = ?"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "computer"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("computer {key}")))?;

        row_to_computer(row)
    }
}

#[derive(sqlx::FromRow)]
struct ComputerRow {
    id: i64,
    uuid: String,
    label: String,
    hostname: String,
    description: String,
    transport_type: String,
    scheduler_type: String,
    metadata: String,
}

const COMPUTER_COLUMNS: &str =
    "id, uuid, label, hostname, description, transport_type, scheduler_type, metadata";

fn row_to_computer(row: ComputerRow) -> Result<Computer, RepositoryError> {
    let uuid = Uuid::parse_str(&row.uuid)
        .map_err(|e| RepositoryError::Serialization(format!("bad computer uuid: {e}")))?;

    Ok(Computer {
        id: row.id,
        uuid,
        label: row.label,
        hostname: row.hostname,
        description: row.description,
        transport_type: row.transport_type,
        scheduler_type: row.scheduler_type,
        metadata: attributes_from_json(&row.metadata)?,
    })
}

#[async_trait]
impl ComputerCollection for SqliteComputerCollection {
    fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    async fn create(&self, computer: NewComputer) -> Result<Computer, RepositoryError> {
        computer.validate()?;
        let metadata = attributes_to_json(&computer.metadata)?;

        let result = sqlx::query(
            r#"
            INSERT INTO computers (uuid, label, hostname, description, transport_type, scheduler_type, metadata)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&computer.label)
        .bind(&computer.hostname)
        .bind(&computer.description)
        .bind(&computer.transport_type)
        .bind(&computer.scheduler_type)
        .bind(&metadata)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("computer `{}`", computer.label)))?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Computer, RepositoryError> {
        let row = sqlx::query_as::<_, ComputerRow>(&format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "computer"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("computer id={id}")))?;

        row_to_computer(row)
    }

    async fn get_by_label(&self, label: &str) -> Result<Computer, RepositoryError> {
        self.fetch_one("label", label, &format!("label={label}"))
            .await
    }

    async fn get_by_uuid(&self, uuid: Uuid) -> Result<Computer, RepositoryError> {
        self.fetch_one("uuid", &uuid.to_string(), &format!("uuid={uuid}"))
            .await
    }

    async fn list(&self) -> Result<Vec<Computer>, RepositoryError> {
        let rows = sqlx::query_as::<_, ComputerRow>(&format!(
            "SELECT {COMPUTER_COLUMNS} FROM computers ORDER BY label"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "computer"))?;

        rows.into_iter().map(row_to_computer).collect()
    }

    async fn update(&self, computer: &Computer) -> Result<(), RepositoryError> {
        computer.validate()?;
        let metadata = attributes_to_json(&computer.metadata)?;

        let result = sqlx::query(
            r#"
            UPDATE computers
            SET label = ?, hostname = ?, description = ?, transport_type = ?, scheduler_type = ?, metadata = ?
            WHERE id = ?
            "#,
        )
        .bind(&computer.label)
        .bind(&computer.hostname)
        .bind(&computer.description)
        .bind(&computer.transport_type)
        .bind(&computer.scheduler_type)
        .bind(&metadata)
        .bind(computer.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, &format!("computer `{}`", computer.label)))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "computer id={}",
                computer.id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        // Verify computer exists
        let computer = self.get_by_id(id).await?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "computer"))?;

        let removed = sqlx::query("DELETE FROM authinfos WHERE computer_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "authinfo"))?
            .rows_affected();

        sqlx::query("DELETE FROM computers WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "computer"))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "computer"))?;

        debug!(label = %computer.label, removed, "deleted computer and its auth-infos");
        Ok(())
    }
}
