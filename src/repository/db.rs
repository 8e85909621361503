//! Database Connection and Setup
//!
//! Manages SQLite database connection and migrations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{Connection, ErrorCode};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation => {
                DomainError::Conflict(e.to_string())
            }
            _ => DomainError::Storage(e.to_string()),
        }
    }
}

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Connection>>,
    path: PathBuf,
}

impl DbState {
    /// Shared connection handle
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Initialize database with path (":memory:" for an in-memory database)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Storage(format!("Failed to open {}: {}", db_path.display(), e)))?;

    run_migrations(&conn)?;
    log::info!("Menu database ready at {}", db_path.display());

    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
        path: db_path.to_path_buf(),
    })
}

/// Current time as unix milliseconds
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS menus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            handle TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at INTEGER,
            updated_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS menu_nodes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            menu_id INTEGER NOT NULL REFERENCES menus(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            url TEXT,
            parent_id INTEGER,
            sort_order REAL NOT NULL DEFAULT 0,
            created_at INTEGER,
            updated_at INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_menu_nodes_parent ON menu_nodes(menu_id, parent_id);",
    )
    .map_err(|e| DomainError::Storage(format!("Migration failed: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menus.db");

        let first = init_db(&path).await.unwrap();
        drop(first);
        let second = init_db(&path).await.unwrap();

        let conn = second.connection();
        let conn = conn.lock().await;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM menu_nodes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(second.path(), path.as_path());
    }

    #[test]
    fn test_constraint_violation_maps_to_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO menus (name, handle) VALUES ('A', 'a')", [])
            .unwrap();

        let err: DomainError = conn
            .execute("INSERT INTO menus (name, handle) VALUES ('B', 'a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
