use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row};

use super::{NoteRepository, RepositoryError, embedded::migrations};
use crate::models::Note;

pub struct PgRepository {
    client: Client,
}

impl PgRepository {
    pub async fn connect(database_dsn: &str) -> Result<Self, RepositoryError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), RepositoryError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        user_email: row.get("user_email"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn list_notes(&self, owner: &str) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .query(
                "SELECT id, title, content, user_email, created_at, updated_at \
                 FROM notes WHERE user_email = $1 ORDER BY id",
                &[&owner],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn get_note(&self, id: i64, owner: &str) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, user_email, created_at, updated_at \
                 FROM notes WHERE id = $1 AND user_email = $2",
                &[&id, &owner],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn create_note(
        &self,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, RepositoryError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (title, content, user_email) VALUES ($1, $2, $3) \
                 RETURNING id, title, content, user_email, created_at, updated_at",
                &[&title, &content, &owner],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update_note(
        &self,
        id: i64,
        owner: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET title = $1, content = $2, updated_at = NOW() \
                 WHERE id = $3 AND user_email = $4 \
                 RETURNING id, title, content, user_email, created_at, updated_at",
                &[&title, &content, &id, &owner],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete_note(&self, id: i64, owner: &str) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .execute(
                "DELETE FROM notes WHERE id = $1 AND user_email = $2",
                &[&id, &owner],
            )
            .await?;

        Ok(rows == 1)
    }
}
