//! Durable collection storage contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the storage contract the records store persists through.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Multi-collection writes are all-or-nothing.
//! - Read paths reject malformed persisted payloads instead of masking them.

pub mod collection_repo;
