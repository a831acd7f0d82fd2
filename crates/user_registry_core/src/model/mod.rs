//! Domain model for user records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the structural validator for caller input.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `UserId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod user;
