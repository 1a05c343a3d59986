//! Screen state controllers.
//!
//! # Responsibility
//! - Own observable screen state and mediate every mutation through a
//!   repository.
//! - Run blocking storage calls off the async executor.

pub mod subject_list;
