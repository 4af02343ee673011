mod embedded;
#[cfg(test)]
pub mod memory;
mod postgres;

pub use postgres::PgRepository;

use async_trait::async_trait;

use crate::models::Note;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    /// Only the in-memory test store reports this.
    #[cfg(test)]
    #[error("store unavailable")]
    Unavailable,
}

/// Storage for notes.
///
/// Every method that touches existing rows takes the owner's email and must
/// include it in the row filter together with the id. Rows owned by someone
/// else are indistinguishable from rows that do not exist.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, RepositoryError>;

    async fn get_note(&self, id: i64, owner: &str) -> Result<Option<Note>, RepositoryError>;

    async fn create_note(
        &self,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, RepositoryError>;

    async fn update_note(
        &self,
        id: i64,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, RepositoryError>;

    /// Returns `false` when no row matched `id` for `owner`.
    async fn delete_note(&self, id: i64, owner: &str) -> Result<bool, RepositoryError>;
}
