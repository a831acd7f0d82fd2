//! Core use-case services.
//!
//! # Responsibility
//! - Hold the business rules between transports and stores.
//! - Keep transport layers decoupled from storage details.

pub mod user_service;
