//! Store layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract consumed by the service layer.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Stores receive already normalized emails.
//! - Store APIs return semantic errors (`NotFound`, `DuplicateEmail`) in
//!   addition to DB transport errors.

pub mod memory_repo;
pub mod user_repo;
