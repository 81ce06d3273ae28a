//! Database connection management

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

use super::migrations;

/// Database wrapper for `SQLite` connections
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Open an in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let database = Self { conn };
        database.configure()?;
        database.migrate()?;
        Ok(database)
    }

    /// Configure `SQLite` for optimal performance
    fn configure(&self) -> Result<()> {
        // WAL is unsupported for in-memory databases; ignore the outcome
        self.conn
            .pragma_update(None, "journal_mode", "WAL")
            .ok();
        self.conn
            .pragma_update(None, "synchronous", "NORMAL")
            .ok();
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM tracker_documents", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_creates_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("vital.db");
        let _db = Database::open(&path).unwrap();
        assert!(path.exists());
    }
}
