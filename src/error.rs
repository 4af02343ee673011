use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::NoteServiceError;

/// Errors that end a request, mapped one-to-one onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Note not found")]
    NotFound,

    /// Details are logged where the error is produced, never sent.
    #[error("Internal Server Error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

impl From<NoteServiceError> for ApiError {
    fn from(err: NoteServiceError) -> Self {
        match err {
            NoteServiceError::InvalidInput(msg) => Self::BadRequest(msg.to_owned()),
            NoteServiceError::NotFound => Self::NotFound,
            NoteServiceError::Repository(e) => {
                tracing::error!("note store operation failed: {e}");
                Self::Internal
            }
        }
    }
}
