//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types shared by the
//! payments domain.

mod errors;
mod events;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{DomainEvent, EventEnvelope, EventId};
pub use timestamp::Timestamp;
