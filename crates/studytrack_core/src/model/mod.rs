//! Domain model for the study tracker.
//!
//! # Invariants
//! - Every subject is identified by a stable integer `SubjectId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod subject;
