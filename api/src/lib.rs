//! formdesk fixture API
//!
//! HTTP backend the admin client talks to. It serves the users form schema
//! and a users collection held in an in-memory [`RecordStore`].
//!
//! # Routes
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  GET    /health                  liveness                     │
//! │  GET    /schema/users            form field schema            │
//! │  GET    /users                   all records, newest first    │
//! │  GET    /users/search?q=         case-insensitive search      │
//! │  POST   /users                   create (201)                 │
//! │  PUT    /users/:id               merge + move to front (404)  │
//! │  DELETE /users/:id               remove (404)                 │
//! │  GET    /api-docs/openapi.json   OpenAPI document             │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod middleware;
pub mod routes;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use formdesk_common::{FieldSchema, RecordStore};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Users collection
    pub store: Arc<RecordStore>,
    /// Schema served for the users form
    pub schema: Arc<Vec<FieldSchema>>,
    /// Delay added to every request
    pub latency: Duration,
}

impl ApiState {
    /// State over an existing store, no added latency
    pub fn new(store: Arc<RecordStore>, schema: Vec<FieldSchema>) -> Self {
        Self {
            store,
            schema: Arc::new(schema),
            latency: Duration::ZERO,
        }
    }

    /// Add a fixed delay to every response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "formdesk fixture API",
        version = "0.1.0",
        description = "In-memory users collection and form schema for the formdesk admin",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::schema::get_schema,
        routes::records::list_records,
        routes::records::search_records,
        routes::records::create_record,
        routes::records::update_record,
        routes::records::delete_record,
    ),
    components(schemas(routes::health::HealthResponse)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "schema", description = "Form schemas"),
        (name = "users", description = "Users collection")
    )
)]
pub struct ApiDoc;

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    let state = Arc::new(state);
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/schema/users", get(routes::schema::get_schema))
        .nest("/users", routes::records::router())
        .layer(from_fn_with_state(state.clone(), middleware::latency::simulate_latency))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
