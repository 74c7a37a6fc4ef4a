//! Core types shared across DiffState facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! macros and by tests asserting on captured events:
//!
//! - **Field keys**: component, op, event, key, stack lengths, error fields
//! - **Event names**: start, end, end_error, end_rejected

pub mod schema;
