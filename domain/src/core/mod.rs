//! Core domain concepts shared across all subdomains.
//!
//! - [`request::QueryRequest`]: a prompt plus per-call overrides
//! - [`result::QueryResult`]: the uniform outcome of one provider query
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod request;
pub mod result;
