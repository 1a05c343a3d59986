//! State controller for the subject list screen.
//!
//! # Responsibility
//! - Publish the full subject list, the filtered list and the search query.
//! - Route add/edit/delete through the repository, then patch the in-memory
//!   list without re-fetching.
//!
//! # Invariants
//! - After every public operation completes, the filtered list equals the
//!   full list filtered by the current query, in full-list order.
//! - In-memory state changes only after the matching storage call succeeds.
//! - Identifier assignment (read max, insert max + 1) is serialized per
//!   controller.
//!
//! In-memory patches are optimistic: they assume the write that just
//! succeeded is what storage now holds. `refresh` re-reads storage wholesale.

use crate::model::subject::{Subject, SubjectId};
use crate::repo::subject_repo::{RepoError, RepoResult, SubjectRepository};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinError;

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Failure of an asynchronous controller command.
#[derive(Debug)]
pub enum ControllerError {
    /// The repository rejected or failed the storage call.
    Repo(RepoError),
    /// The blocking storage task panicked or was cancelled by the runtime.
    Join(JoinError),
    /// The stored maximum id has no successor in `SubjectId`.
    IdSpaceExhausted(SubjectId),
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Join(err) => write!(f, "storage task failed: {err}"),
            Self::IdSpaceExhausted(max_id) => {
                write!(f, "no subject id left after current maximum {max_id}")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Join(err) => Some(err),
            Self::IdSpaceExhausted(_) => None,
        }
    }
}

impl ControllerError {
    fn code(&self) -> &'static str {
        match self {
            Self::Repo(err) => err.code(),
            Self::Join(_) => "storage_task_failed",
            Self::IdSpaceExhausted(_) => "subject_id_exhausted",
        }
    }
}

impl From<RepoError> for ControllerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<JoinError> for ControllerError {
    fn from(value: JoinError) -> Self {
        Self::Join(value)
    }
}

/// Returns the subjects whose title contains `query`, ignoring case.
///
/// Order of `subjects` is preserved. An empty query keeps everything.
pub fn filter_subjects(subjects: &[Subject], query: &str) -> Vec<Subject> {
    if query.is_empty() {
        return subjects.to_vec();
    }
    let needle: Vec<char> = query.chars().collect();
    subjects
        .iter()
        .filter(|subject| contains_ignore_case(&subject.title, &needle))
        .cloned()
        .collect()
}

// Case is folded one char at a time; whole-string lowering is
// context-sensitive (final sigma) and can miss literal matches.
fn contains_ignore_case(haystack: &str, needle: &[char]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let haystack: Vec<char> = haystack.chars().collect();
    haystack.windows(needle.len()).any(|window| {
        window
            .iter()
            .zip(needle)
            .all(|(&left, &right)| chars_eq_ignore_case(left, right))
    })
}

fn chars_eq_ignore_case(left: char, right: char) -> bool {
    left == right
        || left.to_uppercase().eq(right.to_uppercase())
        || left.to_lowercase().eq(right.to_lowercase())
}

/// Observable state holder for the subject list screen.
///
/// Consumers subscribe to `watch` receivers; each receiver sees the latest
/// value immediately and every later publication.
pub struct SubjectListController<R> {
    repo: Arc<R>,
    full_list: watch::Sender<Vec<Subject>>,
    filtered_list: watch::Sender<Vec<Subject>>,
    query: watch::Sender<String>,
    id_assignment: Mutex<()>,
}

impl<R> SubjectListController<R>
where
    R: SubjectRepository + Send + Sync + 'static,
{
    /// Creates a controller with empty lists and an empty query.
    ///
    /// No storage access happens until [`Self::refresh`]; use [`Self::open`]
    /// to construct and load in one step.
    pub fn new(repo: R) -> Self {
        let (full_list, _) = watch::channel(Vec::new());
        let (filtered_list, _) = watch::channel(Vec::new());
        let (query, _) = watch::channel(String::new());
        Self {
            repo: Arc::new(repo),
            full_list,
            filtered_list,
            query,
            id_assignment: Mutex::new(()),
        }
    }

    /// Creates a controller and performs the initial load.
    pub async fn open(repo: R) -> ControllerResult<Self> {
        let controller = Self::new(repo);
        controller.refresh().await?;
        Ok(controller)
    }

    pub fn subscribe_full_list(&self) -> watch::Receiver<Vec<Subject>> {
        self.full_list.subscribe()
    }

    pub fn subscribe_filtered_list(&self) -> watch::Receiver<Vec<Subject>> {
        self.filtered_list.subscribe()
    }

    pub fn subscribe_query(&self) -> watch::Receiver<String> {
        self.query.subscribe()
    }

    /// Snapshot of the full list.
    pub fn full_list(&self) -> Vec<Subject> {
        self.full_list.borrow().clone()
    }

    /// Snapshot of the filtered list.
    pub fn filtered_list(&self) -> Vec<Subject> {
        self.filtered_list.borrow().clone()
    }

    pub fn query(&self) -> String {
        self.query.borrow().clone()
    }

    /// Replaces the search query and republishes the filtered list.
    ///
    /// Storage is not touched. Returns the new filtered list.
    pub fn set_query(&self, text: impl Into<String>) -> Vec<Subject> {
        let text = text.into();
        debug!(
            "event=subjects_set_query module=controller status=ok query_len={}",
            text.chars().count()
        );
        self.query.send_replace(text);
        self.recompute_filtered()
    }

    /// Reloads the full list from storage and re-applies the current query.
    ///
    /// The full list is published first, then the filtered list.
    pub async fn refresh(&self) -> ControllerResult<()> {
        let started_at = Instant::now();
        let subjects = self
            .run_blocking("refresh", |repo| repo.get_all_subjects())
            .await?;
        let count = subjects.len();

        self.full_list.send_replace(subjects);
        self.recompute_filtered();

        info!(
            "event=subjects_refresh module=controller status=ok count={count} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Persists a new subject titled `title` and appends it to the full list.
    ///
    /// Returns `Ok(None)` without touching storage when `title` is empty.
    pub async fn add_subject(&self, title: &str) -> ControllerResult<Option<Subject>> {
        if title.is_empty() {
            debug!("event=subjects_add module=controller status=skipped reason=empty_title");
            return Ok(None);
        }

        let subject = {
            let _guard = self.id_assignment.lock().await;
            let max_id = self
                .run_blocking("add_subject", |repo| repo.get_max_subject_id())
                .await?;
            let id = next_subject_id(max_id).map_err(|err| {
                error!(
                    "event=subjects_add_subject module=controller status=error error_code={} error={err}",
                    err.code()
                );
                err
            })?;
            let subject = Subject::new(id, title);
            let to_insert = subject.clone();
            self.run_blocking("add_subject", move |repo| repo.add_subject(&to_insert))
                .await?;
            subject
        };

        let appended = subject.clone();
        self.full_list.send_modify(|list| list.push(appended));
        self.recompute_filtered();

        info!(
            "event=subjects_add module=controller status=ok subject_id={}",
            subject.id
        );
        Ok(Some(subject))
    }

    /// Persists `new_title` for `subject.id` and replaces that entry in place.
    ///
    /// Returns `Ok(None)` without touching storage when `new_title` is empty.
    pub async fn edit_subject(
        &self,
        subject: &Subject,
        new_title: &str,
    ) -> ControllerResult<Option<Subject>> {
        if new_title.is_empty() {
            debug!(
                "event=subjects_edit module=controller status=skipped reason=empty_title subject_id={}",
                subject.id
            );
            return Ok(None);
        }

        let updated = subject.with_title(new_title);
        let to_write = updated.clone();
        self.run_blocking("edit_subject", move |repo| repo.update_subject(&to_write))
            .await?;

        let replacement = updated.clone();
        self.full_list.send_if_modified(|list| {
            let mut replaced = false;
            for entry in list.iter_mut().filter(|entry| entry.id == replacement.id) {
                *entry = replacement.clone();
                replaced = true;
            }
            replaced
        });
        self.recompute_filtered();

        info!(
            "event=subjects_edit module=controller status=ok subject_id={}",
            updated.id
        );
        Ok(Some(updated))
    }

    /// Deletes `subject` from storage and drops the entry with its id.
    ///
    /// Deleting an id that is not present leaves the full list unchanged.
    pub async fn delete_subject(&self, subject: &Subject) -> ControllerResult<()> {
        let target = subject.clone();
        self.run_blocking("delete_subject", move |repo| repo.delete_subject(&target))
            .await?;

        let id = subject.id;
        let removed = self.full_list.send_if_modified(|list| {
            let before = list.len();
            list.retain(|entry| entry.id != id);
            list.len() != before
        });
        self.recompute_filtered();

        info!("event=subjects_delete module=controller status=ok subject_id={id} removed={removed}");
        Ok(())
    }

    fn recompute_filtered(&self) -> Vec<Subject> {
        let filtered = filter_subjects(&self.full_list.borrow(), &self.query.borrow());
        self.filtered_list.send_replace(filtered.clone());
        filtered
    }

    async fn run_blocking<T, F>(&self, operation: &'static str, call: F) -> ControllerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&R) -> RepoResult<T> + Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        let outcome = match tokio::task::spawn_blocking(move || call(repo.as_ref())).await {
            Ok(result) => result.map_err(ControllerError::from),
            Err(join_err) => Err(ControllerError::from(join_err)),
        };

        if let Err(err) = &outcome {
            error!(
                "event=subjects_{operation} module=controller status=error error_code={} error={err}",
                err.code()
            );
        }
        outcome
    }
}

fn next_subject_id(max_id: Option<SubjectId>) -> ControllerResult<SubjectId> {
    let max_id = max_id.unwrap_or(0);
    max_id
        .checked_add(1)
        .ok_or(ControllerError::IdSpaceExhausted(max_id))
}
