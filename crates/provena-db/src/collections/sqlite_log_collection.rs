//! `SQLite` implementation of the `LogCollection` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use provena_core::{
    BackendHandle, LogCollection, LogEntry, LogFilter, LogLevel, NewLogEntry, RepositoryError,
    SortOrder,
};

use super::row_mappers::{
    attributes_from_json, attributes_to_json, format_bound, format_timestamp, map_sqlx_error,
    parse_timestamp,
};

/// `SQLite` implementation of the `LogCollection` trait.
pub struct SqliteLogCollection {
    pool: SqlitePool,
    backend: BackendHandle,
}

impl SqliteLogCollection {
    /// Create a new `SQLite` log collection.
    pub const fn new(pool: SqlitePool, backend: BackendHandle) -> Self {
        Self { pool, backend }
    }
}

#[derive(sqlx::FromRow)]
struct LogRow {
    id: i64,
    uuid: String,
    time: String,
    logger_name: String,
    level: String,
    node_id: i64,
    message: String,
    metadata: String,
}

const LOG_COLUMNS: &str = "id, uuid, time, logger_name, level, node_id, message, metadata";

fn row_to_entry(row: LogRow) -> Result<LogEntry, RepositoryError> {
    Ok(LogEntry {
        id: row.id,
        uuid: Uuid::parse_str(&row.uuid)
            .map_err(|e| RepositoryError::Serialization(format!("bad log uuid: {e}")))?,
        time: parse_timestamp(&row.time)?,
        logger_name: row.logger_name,
        level: LogLevel::parse(&row.level).ok_or_else(|| {
            RepositoryError::Serialization(format!("unknown log level `{}`", row.level))
        })?,
        node_id: row.node_id,
        message: row.message,
        metadata: attributes_from_json(&row.metadata)?,
    })
}

/// Append the constraint part of `filter` as `WHERE` clauses.
fn push_conditions(builder: &mut QueryBuilder<'_, Sqlite>, filter: &LogFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(level) = filter.level {
        builder.push(" AND level = ").push_bind(level.as_str());
    }
    if let Some(min_level) = filter.min_level {
        builder.push(" AND level IN (");
        let mut levels = builder.separated(", ");
        for level in min_level.and_above() {
            levels.push_bind(level.as_str());
        }
        levels.push_unseparated(")");
    }
    if let Some(name) = &filter.logger_name {
        builder.push(" AND logger_name = ").push_bind(name.clone());
    }
    if let Some(node_id) = filter.node_id {
        builder.push(" AND node_id = ").push_bind(node_id);
    }
    if let Some(since) = filter.since {
        builder.push(" AND time >= ").push_bind(format_bound(since));
    }
    if let Some(until) = filter.until {
        builder.push(" AND time < ").push_bind(format_bound(until));
    }
}

#[async_trait]
impl LogCollection for SqliteLogCollection {
    fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    async fn create_entry(&self, entry: NewLogEntry) -> Result<LogEntry, RepositoryError> {
        if entry.logger_name.trim().is_empty() {
            return Err(RepositoryError::Validation(
                "log entry needs a logger name".to_string(),
            ));
        }
        let time = entry.time.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"
            INSERT INTO logs (uuid, time, logger_name, level, node_id, message, metadata)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(format_timestamp(time))
        .bind(&entry.logger_name)
        .bind(entry.level.as_str())
        .bind(entry.node_id)
        .bind(&entry.message)
        .bind(attributes_to_json(&entry.metadata)?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "log entry"))?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    async fn get_by_id(&self, id: i64) -> Result<LogEntry, RepositoryError> {
        let row = sqlx::query_as::<_, LogRow>(&format!(
            "SELECT {LOG_COLUMNS} FROM logs WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "log entry"))?
        .ok_or_else(|| RepositoryError::NotFound(format!("log id={id}")))?;

        row_to_entry(row)
    }

    async fn find(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {LOG_COLUMNS} FROM logs"));
        push_conditions(&mut builder, filter);

        builder.push(match filter.order {
            SortOrder::Ascending => " ORDER BY time ASC, id ASC",
            SortOrder::Descending => " ORDER BY time DESC, id DESC",
        });

        if filter.limit.is_some() || filter.offset.is_some() {
            // SQLite only accepts OFFSET after LIMIT; -1 means unbounded.
            builder
                .push(" LIMIT ")
                .push_bind(filter.limit.map_or(-1, i64::from));
            builder
                .push(" OFFSET ")
                .push_bind(i64::from(filter.offset.unwrap_or(0)));
        }

        let rows = builder
            .build_query_as::<LogRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "log entry"))?;

        rows.into_iter().map(row_to_entry).collect()
    }

    async fn logs_for_node(&self, node_id: i64) -> Result<Vec<LogEntry>, RepositoryError> {
        self.find(&LogFilter::for_node(node_id)).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM logs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "log entry"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("log id={id}")));
        }

        Ok(())
    }

    async fn delete_many(&self, filter: &LogFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM logs");
        push_conditions(&mut builder, filter);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "log entry"))?;

        debug!(removed = result.rows_affected(), "deleted log entries");
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        self.delete_many(&LogFilter::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestDb;
    use chrono::{DateTime, TimeZone};
    use serde_json::json;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, hour, 0, 0).unwrap()
    }

    async fn seed(logs: &dyn LogCollection) {
        let entries = [
            (1, LogLevel::Info, 9, "started"),
            (1, LogLevel::Report, 10, "step 1 done"),
            (2, LogLevel::Warning, 11, "retrying upload"),
            (1, LogLevel::Error, 12, "job failed"),
            (2, LogLevel::Debug, 13, "polling"),
        ];
        for (node, level, hour, message) in entries {
            logs.create_entry(NewLogEntry::new("provena.engine", level, node, message).at(at(hour)))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_create_entry_round_trip() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();

        let mut new = NewLogEntry::new("provena.calc", LogLevel::Report, 42, "converged");
        new.metadata.insert("iterations".to_string(), json!(17));
        let created = backend.logs().create_entry(new.at(at(8))).await.unwrap();

        assert_eq!(created.time, at(8));
        assert_eq!(created.level, LogLevel::Report);
        assert_eq!(created.metadata["iterations"], 17);
        assert_eq!(backend.logs().get_by_id(created.id).await.unwrap(), created);

        let unnamed = NewLogEntry::new(" ", LogLevel::Info, 42, "x");
        assert!(matches!(
            backend.logs().create_entry(unnamed).await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_find_filters_and_orders() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();
        let logs = backend.logs().as_ref();
        seed(logs).await;

        let node_one = logs.logs_for_node(1).await.unwrap();
        let messages: Vec<_> = node_one.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["started", "step 1 done", "job failed"]);

        let severe = logs
            .find(&LogFilter {
                min_level: Some(LogLevel::Warning),
                order: SortOrder::Descending,
                ..LogFilter::default()
            })
            .await
            .unwrap();
        let messages: Vec<_> = severe.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["job failed", "retrying upload"]);

        let window = logs
            .find(&LogFilter {
                since: Some(at(10)),
                until: Some(at(12)),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(window.len(), 2);

        let exact = logs
            .find(&LogFilter {
                level: Some(LogLevel::Debug),
                logger_name: Some("provena.engine".to_string()),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].node_id, 2);
    }

    #[tokio::test]
    async fn test_sub_microsecond_bounds() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();
        let logs = backend.logs().as_ref();

        let time = at(10) + chrono::Duration::microseconds(250);
        logs.create_entry(NewLogEntry::new("provena.engine", LogLevel::Info, 1, "tick").at(time))
            .await
            .unwrap();
        let just_after = time + chrono::Duration::nanoseconds(500);

        let since = logs
            .find(&LogFilter {
                since: Some(just_after),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert!(since.is_empty());

        let until = logs
            .find(&LogFilter {
                until: Some(just_after),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(until.len(), 1);
        assert_eq!(until[0].time, time);
    }

    #[tokio::test]
    async fn test_find_pagination() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();
        let logs = backend.logs().as_ref();
        seed(logs).await;

        let page = logs
            .find(&LogFilter {
                limit: Some(2),
                offset: Some(1),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        let messages: Vec<_> = page.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["step 1 done", "retrying upload"]);

        let tail = logs
            .find(&LogFilter {
                offset: Some(3),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(tail.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_variants() {
        let db = TestDb::new().await.unwrap();
        let backend = db.backend();
        let logs = backend.logs().as_ref();
        seed(logs).await;

        // Ordering and paging never narrow a delete.
        let removed = logs
            .delete_many(&LogFilter {
                node_id: Some(2),
                limit: Some(1),
                ..LogFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let first = logs.logs_for_node(1).await.unwrap().remove(0);
        logs.delete(first.id).await.unwrap();
        assert!(matches!(
            logs.delete(first.id).await,
            Err(RepositoryError::NotFound(_))
        ));

        assert_eq!(logs.delete_all().await.unwrap(), 2);
        assert!(logs.find(&LogFilter::default()).await.unwrap().is_empty());
    }
}
