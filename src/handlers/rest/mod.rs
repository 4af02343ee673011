use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    auth::{self, CallerIdentity, IdentityGate},
    dto::{NoteRequest, NoteResponse},
    error::ApiError,
    service::NoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(list_notes, create_note, get_note, update_note, delete_note),
    components(schemas(NoteResponse, NoteRequest)),
    tags(
        (name = "notes", description = "Per-user notes API")
    )
)]
pub struct ApiDoc;

/// Routes under `/api/notes`, all behind the identity gate.
pub fn router(service: Arc<NoteService>, gate: Arc<IdentityGate>) -> Router {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route("/api/notes/", get(list_notes).post(create_note))
        .route(
            "/api/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route_layer(middleware::from_fn_with_state(gate, auth::require_identity))
        .with_state(service)
}

fn json_body(payload: Result<Json<NoteRequest>, JsonRejection>) -> Result<NoteRequest, ApiError> {
    payload.map(|Json(request)| request).map_err(|rejection| {
        tracing::debug!("rejected note body: {}", rejection.body_text());
        ApiError::BadRequest("Request body must be a JSON object".to_owned())
    })
}

#[utoipa::path(
    get,
    path = "/api/notes",
    params(
        ("x-user-email" = String, Header, description = "Caller email")
    ),
    responses(
        (status = 200, description = "Notes owned by the caller", body = Vec<NoteResponse>),
        (status = 401, description = "Missing or malformed identity"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn list_notes(
    State(service): State<Arc<NoteService>>,
    identity: CallerIdentity,
) -> Result<Response, ApiError> {
    let notes = service.list_notes(&identity).await?;
    Ok((StatusCode::OK, Json(notes)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/notes",
    params(
        ("x-user-email" = String, Header, description = "Caller email")
    ),
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 400, description = "Title or content missing"),
        (status = 401, description = "Missing or malformed identity"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    identity: CallerIdentity,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let note = service.create_note(&identity, json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(note)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID"),
        ("x-user-email" = String, Header, description = "Caller email")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 400, description = "Invalid note ID"),
        (status = 401, description = "Missing or malformed identity"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_note(
    State(service): State<Arc<NoteService>>,
    identity: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let note = service.get_note(&identity, &id).await?;
    Ok((StatusCode::OK, Json(note)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID"),
        ("x-user-email" = String, Header, description = "Caller email")
    ),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 400, description = "Invalid note ID, title or content"),
        (status = 401, description = "Missing or malformed identity"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    identity: CallerIdentity,
    Path(id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let note = service
        .update_note(&identity, &id, json_body(payload)?)
        .await?;
    Ok((StatusCode::OK, Json(note)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID"),
        ("x-user-email" = String, Header, description = "Caller email")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 400, description = "Invalid note ID"),
        (status = 401, description = "Missing or malformed identity"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    identity: CallerIdentity,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    service.delete_note(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
