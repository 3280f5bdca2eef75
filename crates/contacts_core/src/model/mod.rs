//! Contact domain model.
//!
//! # Responsibility
//! - Define the records exchanged between store, service and callers.
//!
//! # Invariants
//! - Every email belongs to exactly one contact; emails have no lifecycle of
//!   their own.
//! - Deletion is a hard delete that cascades to emails.

pub mod contact;
