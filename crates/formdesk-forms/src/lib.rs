//! formdesk forms
//!
//! Renders, validates and submits a form described by a [`FormSchema`]
//! fetched at runtime.
//!
//! - [`render`] maps each [`FieldSchema`] variant onto a bound control and
//!   draws it through a [`WidgetToolkit`]
//! - [`composer`] owns the values, the submit state machine and payload
//!   normalization
//! - [`dates`] formats and parses the date strings stored in records

pub mod composer;
pub mod dates;
pub mod render;
pub mod value;

pub use composer::*;
pub use dates::*;
pub use render::*;
pub use value::*;

pub use formdesk_common::{FieldSchema, FormSchema, SelectOption};
