use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Note;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Email of the owning user
    pub user_email: String,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            user_email: note.user_email,
        }
    }
}

/// Body of both create and update requests.
///
/// Fields are optional on the wire so that a missing or `null` field is
/// reported as a bad request by the service rather than rejected by the
/// JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteRequest {
    /// Note title
    #[serde(default)]
    pub title: Option<String>,
    /// Note content
    #[serde(default)]
    pub content: Option<String>,
}
