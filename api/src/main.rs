//! formdesk fixture API server

use clap::Parser;
use formdesk_api::{build_router, fixtures, ApiState, ServerConfig};
use formdesk_common::{user_plan_schema, RecordStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::parse();

    let records = fixtures::sample_records(config.seed, &mut rand::thread_rng());
    let store = Arc::new(RecordStore::new().with_records(records));
    let state = ApiState::new(store, user_plan_schema()).with_latency(config.latency());

    let app = build_router(state);

    tracing::info!(
        seed = config.seed,
        latency_ms = config.latency_ms,
        "formdesk API listening on {}",
        config.bind
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
