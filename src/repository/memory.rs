use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{NoteRepository, RepositoryError};
use crate::models::Note;

/// In-process store used by the test suite.
#[derive(Default)]
pub struct MemoryRepository {
    inner: tokio::sync::Mutex<Inner>,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    notes: BTreeMap<i64, Note>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// All stored notes regardless of owner, ordered by id.
    pub async fn snapshot(&self) -> Vec<Note> {
        self.inner.lock().await.notes.values().cloned().collect()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepositoryError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, RepositoryError> {
        self.check()?;
        let inner = self.inner.lock().await;
        Ok(inner
            .notes
            .values()
            .filter(|note| note.user_email == owner)
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: i64, owner: &str) -> Result<Option<Note>, RepositoryError> {
        self.check()?;
        let inner = self.inner.lock().await;
        Ok(inner
            .notes
            .get(&id)
            .filter(|note| note.user_email == owner)
            .cloned())
    }

    async fn create_note(
        &self,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, RepositoryError> {
        self.check()?;
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let now = Utc::now();
        let note = Note {
            id: inner.last_id,
            title: title.to_owned(),
            content: content.to_owned(),
            user_email: owner.to_owned(),
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update_note(
        &self,
        id: i64,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        self.check()?;
        let mut inner = self.inner.lock().await;
        Ok(inner
            .notes
            .get_mut(&id)
            .filter(|note| note.user_email == owner)
            .map(|note| {
                note.title = title.to_owned();
                note.content = content.to_owned();
                note.updated_at = Utc::now();
                note.clone()
            }))
    }

    async fn delete_note(&self, id: i64, owner: &str) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut inner = self.inner.lock().await;
        let owned = inner
            .notes
            .get(&id)
            .is_some_and(|note| note.user_email == owner);
        if owned {
            inner.notes.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::new();
        let first = repo.create_note("a@x.com", "t", "c").await.unwrap();
        assert!(repo.delete_note(first.id, "a@x.com").await.unwrap());

        let second = repo.create_note("a@x.com", "t", "c").await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn foreign_owner_cannot_touch_row() {
        let repo = MemoryRepository::new();
        let note = repo.create_note("a@x.com", "t", "c").await.unwrap();

        assert!(repo.get_note(note.id, "b@x.com").await.unwrap().is_none());
        assert!(
            repo.update_note(note.id, "b@x.com", "x", "y")
                .await
                .unwrap()
                .is_none()
        );
        assert!(!repo.delete_note(note.id, "b@x.com").await.unwrap());
        assert_eq!(repo.snapshot().await, vec![note]);
    }
}
