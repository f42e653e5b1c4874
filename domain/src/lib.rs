//! Domain layer for llm-panel
//!
//! This crate contains the value objects exchanged between layers and the
//! pure consensus analysis. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! One prompt is put to a panel of independently operated LLM backends:
//!
//! - **Query**: a [`QueryRequest`] goes to every panel member
//! - **Result**: each member answers with exactly one [`QueryResult`],
//!   failures included
//! - **Comparison**: the results are summarized by [`comparison::analyze`]

pub mod catalog;
pub mod comparison;
pub mod core;

// Re-export commonly used types
pub use catalog::ModelInfo;
pub use comparison::{ComparisonResult, ComparisonSummary, analyze};
pub use crate::core::{
    error::DomainError,
    request::{ConversationTurn, QueryOptions, QueryRequest, Role},
    result::{QueryFailure, QueryResult, QuerySuccess, TokenUsage},
};
