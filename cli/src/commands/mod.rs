//! CLI Commands

pub mod config;
pub mod records;

use formdesk_client::{AdminPage, HttpTransport, RemoteCollectionClient};
use formdesk_common::FormdeskResult;

use crate::config::Settings;

/// Admin page talking to the configured API
pub fn connect(settings: &Settings) -> FormdeskResult<AdminPage<HttpTransport>> {
    let mut transport = HttpTransport::new(&settings.api_url, &settings.collection);
    if let Some(path) = &settings.schema_path {
        transport = transport.with_schema_path(path);
    }
    Ok(AdminPage::new(
        RemoteCollectionClient::new(transport),
        settings.dates()?,
    ))
}
