//! Core types shared across trackplan facilities
//!
//! This crate provides foundational types used by both the error and the
//! logging facilities:
//!
//! - **Correlation types**: RunId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
