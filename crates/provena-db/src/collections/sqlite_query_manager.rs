//! `SQLite` implementation of the `QueryManager` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use provena_core::{
    BackendHandle, ConfiguredComputer, EntityCounts, LogLevel, LogStatistics, QueryManager,
    RepositoryError,
};

use super::row_mappers::map_sqlx_error;

/// `SQLite` implementation of the `QueryManager` trait.
///
/// Aggregates are computed in SQL. Lookups that cross collections go
/// through the sibling collections of the backend.
pub struct SqliteQueryManager {
    pool: SqlitePool,
    backend: BackendHandle,
}

impl SqliteQueryManager {
    /// Create a new `SQLite` query manager.
    pub const fn new(pool: SqlitePool, backend: BackendHandle) -> Self {
        Self { pool, backend }
    }
}

#[async_trait]
impl QueryManager for SqliteQueryManager {
    fn backend(&self) -> &BackendHandle {
        &self.backend
    }

    async fn entity_counts(&self) -> Result<EntityCounts, RepositoryError> {
        let (users, computers, authinfos, logs): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users),
                (SELECT COUNT(*) FROM computers),
                (SELECT COUNT(*) FROM authinfos),
                (SELECT COUNT(*) FROM logs)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "counts"))?;

        Ok(EntityCounts {
            users,
            computers,
            authinfos,
            logs,
        })
    }

    async fn log_statistics(
        &self,
        node_id: Option<i64>,
    ) -> Result<LogStatistics, RepositoryError> {
        // A NULL node id disables the node constraint.
        let by_level: Vec<(String, i64)> = sqlx::query_as(
            "SELECT level, COUNT(*) FROM logs WHERE (? IS NULL OR node_id = ?) GROUP BY level",
        )
        .bind(node_id)
        .bind(node_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "log statistics"))?;

        let by_day: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT substr(time, 1, 10) AS day, COUNT(*)
            FROM logs
            WHERE (? IS NULL OR node_id = ?)
            GROUP BY day
            "#,
        )
        .bind(node_id)
        .bind(node_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "log statistics"))?;

        let mut stats = LogStatistics::default();
        for (level, count) in by_level {
            let level = LogLevel::parse(&level).ok_or_else(|| {
                RepositoryError::Serialization(format!("unknown log level `{level}`"))
            })?;
            stats.total += count;
            stats.by_level.insert(level, count);
        }
        stats.by_day = by_day.into_iter().collect();

        Ok(stats)
    }

    async fn computers_for_user(
        &self,
        email: &str,
    ) -> Result<Vec<ConfiguredComputer>, RepositoryError> {
        let backend = self.backend.require()?;
        let user = backend.users().get_by_email(email).await?;

        let mut configured = Vec::new();
        for authinfo in backend.authinfos().list_for_user(user.id).await? {
            let computer = backend.computers().get_by_id(authinfo.computer_id).await?;
            configured.push(ConfiguredComputer {
                computer,
                enabled: authinfo.enabled,
            });
        }
        configured.sort_by(|a, b| a.computer.label.cmp(&b.computer.label));

        Ok(configured)
    }
}
