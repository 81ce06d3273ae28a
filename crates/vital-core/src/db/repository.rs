//! Tracker document repository implementation

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::UserId;
use crate::store::TrackerDocument;

/// Trait for per-user document storage operations
pub trait DocumentRepository {
    /// Load the stored document for a user
    fn load(&self, user: &UserId) -> Result<Option<TrackerDocument>>;

    /// Merge a patch into the stored document for a user
    ///
    /// Sections present in the patch overwrite the stored sections; absent
    /// sections are left untouched. A missing row is created from the patch.
    fn save(&self, user: &UserId, patch: &TrackerDocument) -> Result<()>;
}

/// `SQLite` implementation of `DocumentRepository`
pub struct SqliteDocumentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteDocumentRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn load(&self, user: &UserId) -> Result<Option<TrackerDocument>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM tracker_documents WHERE user_id = ?",
                params![user.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, user: &UserId, patch: &TrackerDocument) -> Result<()> {
        let mut document = self.load(user)?.unwrap_or_default();
        document.apply_patch(patch);

        let raw = serde_json::to_string(&document)?;
        let now = chrono::Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO tracker_documents (user_id, document, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 document = excluded.document,
                 updated_at = excluded.updated_at",
            params![user.as_str(), raw, now],
        )?;

        Ok(())
    }
}
