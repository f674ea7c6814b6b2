//! CLI library components for subhub.

pub mod config;
pub mod logging;
pub mod summary;
pub mod types;
