//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, timestamps, event envelope)
//! - `payment` - Checkout requests, webhook verification and translation

pub mod foundation;
pub mod payment;
