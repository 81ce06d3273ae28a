//! Shared tracker store service used across clients.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{Database, DocumentRepository, SqliteDocumentRepository};
use crate::models::UserId;
use crate::store::TrackerDocument;
use crate::Result;

/// Thread-safe service for document store operations.
///
/// Clones share one underlying database connection; document reads and
/// writes are serialized behind it, which also keeps concurrent section
/// merges from clobbering each other.
#[derive(Clone)]
pub struct TrackerStore {
    db: Arc<Mutex<Database>>,
}

impl TrackerStore {
    /// Open a store at the given filesystem path.
    pub fn open_path(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Open an in-memory store (primarily for tests).
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// Fetch the stored document for a user, if any.
    pub async fn load_document(&self, user: &UserId) -> Result<Option<TrackerDocument>> {
        let db = self.db.lock().await;
        let repo = SqliteDocumentRepository::new(db.connection());
        repo.load(user)
    }

    /// Merge a patch into the stored document for a user.
    pub async fn apply_patch(&self, user: &UserId, patch: &TrackerDocument) -> Result<()> {
        let db = self.db.lock().await;
        let repo = SqliteDocumentRepository::new(db.connection());
        repo.save(user, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Habit, HabitTime};

    #[tokio::test(flavor = "multi_thread")]
    async fn in_memory_patch_and_load_roundtrip() {
        let store = TrackerStore::open_in_memory().unwrap();
        let user = UserId::new("test-user").unwrap();

        let habit = Habit::new("Read", 2, HabitTime::Evening).unwrap();
        store
            .apply_patch(&user, &TrackerDocument::habits_patch(&[habit.clone()]))
            .await
            .unwrap();

        let document = store.load_document(&user).await.unwrap().unwrap();
        assert_eq!(document.habits, Some(vec![habit]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clones_share_one_database() {
        let store = TrackerStore::open_in_memory().unwrap();
        let clone = store.clone();
        let user = UserId::new("test-user").unwrap();

        let habit = Habit::new("Read", 2, HabitTime::Evening).unwrap();
        store
            .apply_patch(&user, &TrackerDocument::habits_patch(&[habit]))
            .await
            .unwrap();

        assert!(clone.load_document(&user).await.unwrap().is_some());
    }
}
