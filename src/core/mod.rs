//! Core building blocks for railyard runs
//!
//! - **config**: run inputs (flags, railyard.toml, environment) resolved once
//! - **error**: comprehensive error types with contextual help messages
//! - **outputs**: step outputs for downstream workflow jobs

pub mod config;
pub mod error;
pub mod outputs;
