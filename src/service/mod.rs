use crate::{
    auth::CallerIdentity,
    dto::{NoteRequest, NoteResponse},
    repository::{NoteRepository, RepositoryError},
};

use std::sync::Arc;

const FIELDS_REQUIRED: &str = "Title and content are required";
const INVALID_ID: &str = "ID must be valid number";

#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The id does not exist or belongs to another user.
    #[error("note not found")]
    NotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Note operations scoped to a single caller.
///
/// Input is validated before the store is touched, and the caller's email is
/// part of every store filter.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_notes(
        &self,
        identity: &CallerIdentity,
    ) -> Result<Vec<NoteResponse>, NoteServiceError> {
        let notes = self.repo.list_notes(identity.as_str()).await?;
        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }

    pub async fn get_note(
        &self,
        identity: &CallerIdentity,
        raw_id: &str,
    ) -> Result<NoteResponse, NoteServiceError> {
        let id = parse_note_id(raw_id)?;

        self.repo
            .get_note(id, identity.as_str())
            .await?
            .map(NoteResponse::from)
            .ok_or(NoteServiceError::NotFound)
    }

    pub async fn create_note(
        &self,
        identity: &CallerIdentity,
        request: NoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let (title, content) = required_fields(&request)?;

        let note = self
            .repo
            .create_note(identity.as_str(), title, content)
            .await?;

        tracing::info!(owner = %identity, id = note.id, "note created");
        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        identity: &CallerIdentity,
        raw_id: &str,
        request: NoteRequest,
    ) -> Result<NoteResponse, NoteServiceError> {
        let id = parse_note_id(raw_id)?;
        let (title, content) = required_fields(&request)?;

        let note = self
            .repo
            .update_note(id, identity.as_str(), title, content)
            .await?
            .ok_or(NoteServiceError::NotFound)?;

        tracing::debug!(owner = %identity, id, "note updated");
        Ok(note.into())
    }

    pub async fn delete_note(
        &self,
        identity: &CallerIdentity,
        raw_id: &str,
    ) -> Result<(), NoteServiceError> {
        let id = parse_note_id(raw_id)?;

        if !self.repo.delete_note(id, identity.as_str()).await? {
            return Err(NoteServiceError::NotFound);
        }

        tracing::info!(owner = %identity, id, "note deleted");
        Ok(())
    }
}

/// Ids are assigned by the store starting from 1, so anything that is not a
/// positive integer cannot name a note.
fn parse_note_id(raw: &str) -> Result<i64, NoteServiceError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(NoteServiceError::InvalidInput(INVALID_ID)),
    }
}

fn required_fields(request: &NoteRequest) -> Result<(&str, &str), NoteServiceError> {
    match (request.title.as_deref(), request.content.as_deref()) {
        (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
            Ok((title, content))
        }
        _ => Err(NoteServiceError::InvalidInput(FIELDS_REQUIRED)),
    }
}
