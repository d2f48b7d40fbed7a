//! Schema fetcher

use formdesk_common::{FormSchema, FormdeskResult};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::collection::RemoteCollectionClient;
use crate::transport::CollectionTransport;

/// Fetches the form schema once and hands out the validated copy after that.
#[derive(Debug, Default)]
pub struct SchemaFetcher {
    schema: OnceCell<FormSchema>,
}

impl SchemaFetcher {
    /// Nothing fetched yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch on first call, reuse afterwards. A failed fetch is retried on
    /// the next call.
    pub async fn get<T: CollectionTransport>(
        &self,
        client: &RemoteCollectionClient<T>,
    ) -> FormdeskResult<&FormSchema> {
        self.schema
            .get_or_try_init(|| async {
                let fields = client.fetch_schema().await?;
                debug!(fields = fields.len(), "form schema fetched");
                FormSchema::new(fields)
            })
            .await
    }

    /// Schema if already fetched
    pub fn loaded(&self) -> Option<&FormSchema> {
        self.schema.get()
    }
}
