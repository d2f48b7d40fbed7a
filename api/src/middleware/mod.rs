//! API middleware

pub mod latency;
