//! Output formatters

pub mod console;
pub mod markdown;
pub mod stream;
