//! Database schema.
//!
//! Every statement is idempotent so the schema can be applied on each open.

use sqlx::SqlitePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        institution TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS computers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid TEXT NOT NULL UNIQUE,
        label TEXT NOT NULL UNIQUE,
        hostname TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        transport_type TEXT NOT NULL,
        scheduler_type TEXT NOT NULL,
        metadata TEXT NOT NULL DEFAULT '{}'
    )
    "#,
    // No ON DELETE CASCADE: auth-infos are removed through the auth-info
    // collection before their user or computer goes away.
    r#"
    CREATE TABLE IF NOT EXISTS authinfos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        computer_id INTEGER NOT NULL,
        enabled INTEGER NOT NULL DEFAULT 1,
        auth_params TEXT NOT NULL DEFAULT '',
        metadata TEXT NOT NULL DEFAULT '{}',
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (computer_id) REFERENCES computers(id),
        UNIQUE(user_id, computer_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_authinfos_computer ON authinfos(computer_id)",
    r#"
    CREATE TABLE IF NOT EXISTS logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        uuid TEXT NOT NULL UNIQUE,
        time TEXT NOT NULL,
        logger_name TEXT NOT NULL,
        level TEXT NOT NULL
            CHECK (level IN ('DEBUG', 'INFO', 'REPORT', 'WARNING', 'ERROR', 'CRITICAL')),
        node_id INTEGER NOT NULL,
        message TEXT NOT NULL DEFAULT '',
        metadata TEXT NOT NULL DEFAULT '{}'
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_logs_node ON logs(node_id)",
    "CREATE INDEX IF NOT EXISTS idx_logs_time ON logs(time)",
];

/// Creates every table and index.
pub(crate) async fn apply(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}
