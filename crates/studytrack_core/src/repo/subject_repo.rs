//! Subject repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the CRUD surface the subject list screen depends on.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Subject::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `get_all_subjects` returns rows ordered by ascending id.

use crate::db::DbError;
use crate::model::subject::{Subject, SubjectId, SubjectValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subject persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(SubjectValidationError),
    Db(DbError),
    NotFound(SubjectId),
    InvalidData(String),
    /// A thread panicked while holding the shared connection.
    ConnectionPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subject not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted subject data: {message}"),
            Self::ConnectionPoisoned => write!(f, "subject store connection lock is poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::ConnectionPoisoned => None,
        }
    }
}

impl RepoError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "subject_invalid",
            Self::Db(_) => "db_error",
            Self::NotFound(_) => "subject_not_found",
            Self::InvalidData(_) => "invalid_data",
            Self::ConnectionPoisoned => "connection_poisoned",
        }
    }
}

impl From<SubjectValidationError> for RepoError {
    fn from(value: SubjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator for the subject list screen.
///
/// Calls are blocking; async callers must move them off the executor.
pub trait SubjectRepository {
    /// Returns every subject ordered by ascending id.
    fn get_all_subjects(&self) -> RepoResult<Vec<Subject>>;
    /// Returns the highest stored id, or `None` for an empty store.
    fn get_max_subject_id(&self) -> RepoResult<Option<SubjectId>>;
    /// Inserts a new row. An existing id is a storage error.
    fn add_subject(&self, subject: &Subject) -> RepoResult<()>;
    /// Rewrites the title of an existing row.
    fn update_subject(&self, subject: &Subject) -> RepoResult<()>;
    /// Deletes the row with `subject.id`. Missing rows are ignored.
    fn delete_subject(&self, subject: &Subject) -> RepoResult<()>;
}

/// SQLite-backed subject repository.
///
/// Owns a shared connection handle so it can be cloned into blocking tasks.
#[derive(Clone)]
pub struct SqliteSubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSubjectRepository {
    /// Wraps a migrated connection (see [`crate::db::open_db`]).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::ConnectionPoisoned)
    }
}

impl SubjectRepository for SqliteSubjectRepository {
    fn get_all_subjects(&self) -> RepoResult<Vec<Subject>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, title FROM subjects ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();

        while let Some(row) = rows.next()? {
            subjects.push(parse_subject_row(row)?);
        }

        Ok(subjects)
    }

    fn get_max_subject_id(&self) -> RepoResult<Option<SubjectId>> {
        let conn = self.lock()?;
        let max_id = conn.query_row("SELECT MAX(id) FROM subjects;", [], |row| {
            row.get::<_, Option<SubjectId>>(0)
        })?;
        Ok(max_id)
    }

    fn add_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO subjects (id, title) VALUES (?1, ?2);",
            params![subject.id, subject.title.as_str()],
        )?;
        Ok(())
    }

    fn update_subject(&self, subject: &Subject) -> RepoResult<()> {
        subject.validate()?;

        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE subjects SET title = ?1 WHERE id = ?2;",
            params![subject.title.as_str(), subject.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(subject.id));
        }
        Ok(())
    }

    fn delete_subject(&self, subject: &Subject) -> RepoResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM subjects WHERE id = ?1;", [subject.id])?;
        Ok(())
    }
}

fn parse_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let subject = Subject {
        id: row.get("id")?,
        title: row.get("title")?,
    };
    subject.validate().map_err(|err| {
        RepoError::InvalidData(format!("subject row {} failed validation: {err}", subject.id))
    })?;
    Ok(subject)
}
