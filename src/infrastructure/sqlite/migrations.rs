use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schemes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            benefit TEXT,
            eligibility TEXT NOT NULL DEFAULT '{}',
            application TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vectors (
            namespace TEXT NOT NULL,
            id TEXT NOT NULL,
            vector BLOB NOT NULL,
            metadata TEXT NOT NULL DEFAULT '{}',
            text_excerpt TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            PRIMARY KEY (namespace, id)
        );

        CREATE INDEX IF NOT EXISTS idx_schemes_category ON schemes(category);
        CREATE INDEX IF NOT EXISTS idx_schemes_created ON schemes(created_at);
        CREATE INDEX IF NOT EXISTS idx_vectors_namespace ON vectors(namespace);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
