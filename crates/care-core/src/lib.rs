//! # care-core
//!
//! Core types and error kinds for the care record store.
//!
//! This crate provides the foundational types shared across all care crates:
//! - Entity structs for support records, incident reports, trash entries and audit events
//! - Status enums with state machine transitions
//! - Partition naming for live, archive and trash partitions
//! - Continuation tokens for stateless pagination
//! - Cross-cutting error types and the error kind taxonomy
//! - Response types returned by paginated queries and maintenance jobs
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod names;
pub mod pagination;
pub mod partitions;
pub mod responses;
