//! Domain model for saved links and their collections.
//!
//! # Responsibility
//! - Define the records persisted as JSON arrays by the record store.
//! - Define typed patches used for partial updates.
//!
//! # Invariants
//! - Every record is identified by a caller-provided string id.
//! - `updated_at >= created_at` after any patch is applied.
//! - Link -> Collection membership is a weak reference by id.

pub mod collection;
pub mod link;
