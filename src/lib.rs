//! Payments Gateway - Stripe checkout sessions and webhook translation
//!
//! This crate opens hosted checkout sessions with Stripe on behalf of an order
//! and turns verified `charge.succeeded` webhooks into `payment.succeed`
//! events on the message broker.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
