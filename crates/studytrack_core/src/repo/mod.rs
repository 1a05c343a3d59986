//! Repository layer for subject persistence.
//!
//! # Responsibility
//! - Define the storage contract the list screen is written against.
//! - Isolate SQLite query details from screen state orchestration.

pub mod subject_repo;
