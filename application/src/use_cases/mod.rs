//! Use cases for the application layer

pub mod ask_all;
pub mod ask_single;
pub mod compare;
pub mod fan_out;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;
