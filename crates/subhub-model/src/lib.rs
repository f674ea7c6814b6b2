pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod request;
pub mod row;

pub use diagnostics::{BatchFailure, BatchOutcome, RejectReason, Rejection};
pub use entity::{ChildViolation, Entity, EntityKind, EntityUpdate};
pub use error::{ModelError, Result};
pub use request::CreateCustomerRequest;
pub use row::{FlattenedRow, ORG_KEY_PREFIX, SUBORG_KEY_PREFIX};
