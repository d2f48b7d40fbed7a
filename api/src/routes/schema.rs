//! Form schema endpoint

use axum::{extract::State, Json};
use formdesk_common::FieldSchema;
use std::sync::Arc;

use crate::ApiState;

/// Field schema for the users form
#[utoipa::path(
    get,
    path = "/schema/users",
    responses(
        (status = 200, description = "Ordered field descriptors, tagged by `component`")
    ),
    tag = "schema"
)]
pub async fn get_schema(State(state): State<Arc<ApiState>>) -> Json<Vec<FieldSchema>> {
    Json(state.schema.as_ref().clone())
}
