//! formdesk client
//!
//! Client-side data layer and view models for the admin:
//!
//! - [`transport`]: the fetch-like seam, with an in-memory test double
//! - [`http`]: the reqwest implementation against the fixture API
//! - [`cache`]: TTL-less query cache invalidated by mutations
//! - [`collection`]: CRUD + search client for one resource
//! - [`schema`]: fetches the form schema once
//! - [`table`]: record table view model
//! - [`page`]: controller tying table, dialog and client together

pub mod cache;
pub mod collection;
pub mod http;
pub mod page;
pub mod schema;
pub mod table;
pub mod transport;

pub use cache::{QueryCache, QueryKey};
pub use collection::{RemoteCollectionClient, SearchTicket};
pub use http::HttpTransport;
pub use page::{AdminPage, Dialog, DialogMode, Notice, TITLE_FIELD};
pub use schema::SchemaFetcher;
pub use table::{
    Column, ColumnKind, RecordTable, Row, RowAction, TableState, TableView, ACTIONS_TITLE,
    DEFAULT_PAGE_SIZE,
};
pub use transport::{CollectionTransport, InMemoryTransport};
