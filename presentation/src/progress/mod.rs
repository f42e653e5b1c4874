//! Progress display for fan-out queries

pub mod reporter;
