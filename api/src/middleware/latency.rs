//! Simulated network latency

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::ApiState;

/// Sleep for the configured latency before handling the request
pub async fn simulate_latency(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    if !state.latency.is_zero() {
        tokio::time::sleep(state.latency).await;
    }
    next.run(req).await
}
