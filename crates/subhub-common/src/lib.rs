//! Shared utilities for subhub crates.
//!
//! This crate provides common utilities used across the subhub workspace,
//! including JSON value coercion helpers and the injectable clock.

pub mod clock;
pub mod json;

// Re-export commonly used items at crate root for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use json::{
    is_blank, json_type_name, parse_f64, parse_i64, value_to_i64, value_to_string,
    value_to_string_non_empty, value_to_u64,
};
