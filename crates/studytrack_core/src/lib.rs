//! Core logic for the study subject tracker.
//! Storage, domain model and screen state live here; front ends only render.

pub mod controller;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use controller::subject_list::{
    filter_subjects, ControllerError, ControllerResult, SubjectListController,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::subject::{Subject, SubjectId, SubjectValidationError};
pub use repo::subject_repo::{RepoError, RepoResult, SqliteSubjectRepository, SubjectRepository};

/// Minimal health-check API for front-end wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
