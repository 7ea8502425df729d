//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory collections and their write rules (`records_store`).
//! - Provide bulk transfer and read-only reporting on top of the store.
//! - Keep callers decoupled from storage details.

pub mod records_store;
pub mod report_service;
pub mod transfer;
