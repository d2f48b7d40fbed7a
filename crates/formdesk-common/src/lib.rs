//! formdesk common - shared types for the schema-driven admin
//!
//! This crate holds the pieces every other formdesk crate agrees on:
//! - Field schema descriptors fetched from the backend
//! - Records and their flat field payloads
//! - The canonical search rule
//! - The in-memory record store used by the fixture API and test doubles
//! - Error handling
//!
//! # Data flow
//!
//! ```text
//! ┌──────────────┐    FormSchema    ┌───────────────┐   Payload   ┌──────────────────┐
//! │ SchemaFetcher│ ───────────────▶ │ Form Composer │ ──────────▶ │ Collection Client│
//! └──────────────┘                  └───────────────┘             └────────┬─────────┘
//!                                          ▲                               │ invalidate
//!                                          │ edit values                   ▼
//!                                   ┌──────┴───────┐    records    ┌──────────────┐
//!                                   │ Record Table │ ◀──────────── │ Query cache  │
//!                                   └──────────────┘               └──────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod schema;
pub mod search;
pub mod store;

pub use error::*;
pub use record::*;
pub use schema::*;
pub use search::*;
pub use store::*;
