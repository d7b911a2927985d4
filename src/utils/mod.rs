//! Shared helpers: digit-run extraction and retry configuration.

pub mod extract;
pub mod retry;
