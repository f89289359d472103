//! Repository layer over the key-value blob store.
//!
//! # Responsibility
//! - Translate record lists to and from JSON blobs.
//! - Keep serialization details out of services.
//!
//! # Invariants
//! - Repository APIs distinguish absent data from corrupt data.
//! - Storage write failures are returned to the caller, never swallowed.

pub mod record_store;
