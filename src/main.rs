mod auth;
mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod repository;
mod service;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use std::sync::Arc;

use auth::IdentityGate;
use handlers::rest;
use repository::PgRepository;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!(
        "Successfully loaded config, identity header: {}",
        cfg.identity_header
    );

    let gate = IdentityGate::new(&cfg.identity_header).unwrap_or_else(|e| {
        tracing::error!("Invalid identity header name: {e}");
        panic!("invalid identity header name: {e}");
    });

    // Repository creation and migration
    let mut repo = PgRepository::connect(&cfg.database_dsn)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(Arc::new(repo)));

    // Router config
    let router = Router::new()
        .route("/", get(root))
        .merge(rest::router(service, Arc::new(gate)))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.rest_port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.rest_port);
            panic!("failed to bind port {}: {e}", cfg.rest_port);
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("REST server starting, listening on {}", addr),
        Err(e) => tracing::warn!("REST server starting, local address unknown: {e}"),
    }

    axum::serve(listener, router).await.unwrap_or_else(|e| {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    });
}

async fn root() -> Response {
    (StatusCode::OK, "Notes server is up").into_response()
}
