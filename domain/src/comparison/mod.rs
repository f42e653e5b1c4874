//! Cross-provider comparison
//!
//! Holds the [`ComparisonResult`] produced by a compare run and the
//! heuristic [`analyze`] function that summarizes agreement and divergence
//! between the successful answers.
//!
//! The analysis is keyword and structure based, not semantic:
//!
//! - **Consensus**: words that most answers share
//! - **Differences**: length spread and capitalized topics only one answer mentions
//! - **Best response**: the answer with the highest structure/length score

pub mod analyzer;
pub mod result;

pub use analyzer::{analyze, common_keywords, key_differences, score_response};
pub use result::{ComparisonResult, ComparisonSummary};
