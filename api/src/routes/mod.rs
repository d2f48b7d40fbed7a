//! API Routes

pub mod health;
pub mod records;
pub mod schema;
