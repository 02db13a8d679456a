//! Personnel domain model.
//!
//! # Responsibility
//! - Define the worker record, its variants and field validation.
//! - Define the storage-neutral row shape used by every backend.
//!
//! # Invariants
//! - Every worker is identified by a validated `WorkerId`.
//! - Variants are selected by an explicit `WorkerKind` tag.

pub mod record;
pub mod worker;
