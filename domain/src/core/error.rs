//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Invalid query options: {0}")]
    InvalidOptions(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}
