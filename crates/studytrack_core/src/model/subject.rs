//! Subject domain model.
//!
//! # Responsibility
//! - Define the study subject record shared by storage and the list screen.
//! - Validate records before they cross the persistence boundary.
//!
//! # Invariants
//! - `id` is positive and identifies the subject; list patches match on it.
//! - `title` is never empty once persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer identifier of a subject row.
///
/// New ids are assigned as current maximum plus one.
pub type SubjectId = i64;

/// A user-defined study topic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub title: String,
}

/// Validation failures for [`Subject`] records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectValidationError {
    EmptyTitle,
    NonPositiveId(SubjectId),
}

impl Display for SubjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "subject title cannot be empty"),
            Self::NonPositiveId(id) => write!(f, "subject id must be positive, got {id}"),
        }
    }
}

impl Error for SubjectValidationError {}

impl Subject {
    pub fn new(id: SubjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Returns a copy carrying `title` under the same identifier.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            id: self.id,
            title: title.into(),
        }
    }

    /// Checks the record against persistence invariants.
    pub fn validate(&self) -> Result<(), SubjectValidationError> {
        if self.id <= 0 {
            return Err(SubjectValidationError::NonPositiveId(self.id));
        }
        if self.title.is_empty() {
            return Err(SubjectValidationError::EmptyTitle);
        }
        Ok(())
    }
}
