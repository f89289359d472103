//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record-store calls into use-case level APIs.
//! - Keep front ends decoupled from storage and serialization details.
//!
//! # Invariants
//! - Services receive the record store by reference; none owns a global one.

pub mod collection_service;
pub mod link_preview;
pub mod link_service;
pub mod seed_service;
pub mod transfer_service;
