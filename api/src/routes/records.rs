//! Users collection endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use formdesk_common::{Payload, Record};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, ApiState};

/// Routes mounted under `/users`
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/search", get(search_records))
        .route("/:id", put(update_record).delete(delete_record))
}

/// Query string of the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

/// List all users, most recently created or edited first
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Every record, newest first")),
    tag = "users"
)]
pub async fn list_records(State(state): State<Arc<ApiState>>) -> Json<Vec<Record>> {
    Json(state.store.list())
}

/// Search users by user, title and description
#[utoipa::path(
    get,
    path = "/users/search",
    params(("q" = Option<String>, Query, description = "Case-insensitive substring")),
    responses((status = 200, description = "Matching records, stored order")),
    tag = "users"
)]
pub async fn search_records(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Record>> {
    Json(state.store.search(&params.q))
}

/// Create a user; it is listed first
#[utoipa::path(
    post,
    path = "/users",
    responses((status = 201, description = "Created record with its new id")),
    tag = "users"
)]
pub async fn create_record(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<Payload>,
) -> (StatusCode, Json<Record>) {
    let record = state.store.create(payload);
    info!(id = %record.id, "user created");
    (StatusCode::CREATED, Json(record))
}

/// Merge fields into a user and list it first
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Updated record"),
        (status = 404, description = "Unknown id")
    ),
    tag = "users"
)]
pub async fn update_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(payload): Json<Payload>,
) -> Result<Json<Record>, ApiError> {
    let record = state.store.update(&id, &payload)?;
    info!(%id, "user updated");
    Ok(Json(record))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Remaining records"),
        (status = 404, description = "Unknown id")
    ),
    tag = "users"
)]
pub async fn delete_record(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Record>>, ApiError> {
    state.store.delete(&id)?;
    info!(%id, "user deleted");
    Ok(Json(state.store.list()))
}

#[cfg(test)]
mod tests {
    use crate::{build_router, ApiState};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use formdesk_common::{user_plan_schema, ErrorBody, Payload, Record, RecordStore};
    use std::sync::Arc;

    fn server() -> (TestServer, Arc<RecordStore>) {
        let store = Arc::new(RecordStore::new());
        let router = build_router(ApiState::new(store.clone(), user_plan_schema()));
        (TestServer::new(router).unwrap(), store)
    }

    fn titled(title: &str) -> Payload {
        Payload::from([("title".to_string(), title.to_string())])
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let (server, _) = server();

        let created = server.post("/users").json(&titled("A")).await;
        created.assert_status(StatusCode::CREATED);
        let a: Record = created.json();
        assert!(!a.id.is_empty());
        server.post("/users").json(&titled("B")).await;

        let list: Vec<Record> = server.get("/users").await.json();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].get("title"), Some("B"));
        assert_eq!(list[1], a);
    }

    #[tokio::test]
    async fn test_update_moves_to_front() {
        let (server, store) = server();
        let a = store.create(titled("A"));
        store.create(titled("B"));

        let updated: Record = server
            .put(&format!("/users/{}", a.id))
            .json(&Payload::from([("description".to_string(), "x".to_string())]))
            .await
            .json();
        assert_eq!(updated.get("title"), Some("A"));
        assert_eq!(store.list()[0].id, a.id);
    }

    #[tokio::test]
    async fn test_unknown_id_is_404_with_error_body() {
        let (server, store) = server();
        store.create(titled("A"));

        let resp = server.put("/users/missing-id").json(&titled("x")).await;
        resp.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorBody = resp.json();
        assert!(body.error.contains("missing-id"));

        let resp = server.delete("/users/missing-id").await;
        resp.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_returns_remaining() {
        let (server, store) = server();
        let a = store.create(titled("A"));
        store.create(titled("B"));

        let remaining: Vec<Record> = server.delete(&format!("/users/{}", a.id)).await.json();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].get("title"), Some("B"));
    }

    #[tokio::test]
    async fn test_search_lowercases_query() {
        let (server, store) = server();
        store.create(Payload::from([
            ("user".to_string(), "Maria".to_string()),
            ("title".to_string(), "Ski week".to_string()),
        ]));
        store.create(titled("Beach"));

        let hits: Vec<Record> = server
            .get("/users/search")
            .add_query_param("q", "MARIA")
            .await
            .json();
        assert_eq!(hits.len(), 1);

        let all: Vec<Record> = server.get("/users/search").await.json();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_schema_and_health() {
        let (server, _) = server();
        let schema: serde_json::Value = server.get("/schema/users").await.json();
        assert_eq!(schema[0]["component"], "text");
        assert_eq!(schema[3]["component"], "range_picker");

        let health: crate::routes::health::HealthResponse = server.get("/health").await.json();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.records, 0);

        let doc: serde_json::Value = server.get("/api-docs/openapi.json").await.json();
        assert!(doc["paths"]["/users/{id}"].is_object());
    }
}
