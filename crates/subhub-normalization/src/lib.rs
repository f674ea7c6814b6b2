//! Customer record normalization for subhub.
//!
//! Webhook responses name the same field in several ways. This crate
//! reconciles them into canonical [`subhub_model::Entity`] values and derives
//! the flattened organization hierarchy used by search and selection lists.
//!
//! - [`aliases`] - fixed per-field key precedence tables
//! - [`normalizer`] - single-record and batch normalization
//! - [`timestamp`] - `createdAt` parsing
//! - [`flatten`] - hierarchy flattening, sub-organization filter, search

pub mod aliases;
pub mod flatten;
pub mod normalizer;
pub mod timestamp;

pub use aliases::{AliasTable, first_present};
pub use flatten::{flatten_hierarchy, search_rows, sub_organizations_only};
pub use normalizer::{EntityNormalizer, NormalizeOptions, normalize_batch, normalize_entity};
pub use timestamp::parse_timestamp;
