use std::sync::{Arc, Mutex, MutexGuard};

use progress_core::Clock;
use progress_core::model::{Catalog, LessonEdit, NewCourse};
use progress_core::progress::{Progress, completed_notes};
use storage::CatalogRepository;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::export::{CsvExport, render_course_csv};
use crate::session::view::{CompletedNote, Refresh, SessionSnapshot};

/// Behaviour switches for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Mark today's date in the streak calendar on every persisted change.
    pub record_streak: bool,
}

#[derive(Debug)]
struct SessionState {
    catalog: Catalog,
    selected: Option<String>,
    delete_pending: bool,
}

impl SessionState {
    /// The course the user is looking at: the explicit selection if it still
    /// exists, otherwise the first course.
    fn effective_selection(&self) -> Option<&str> {
        self.selected
            .as_deref()
            .filter(|title| self.catalog.contains(title))
            .or_else(|| self.catalog.first_title())
    }
}

/// Mediates one user's actions against the catalog store.
///
/// Holds the authoritative working copy for the session. Every mutating
/// action builds a changed copy, rewrites the whole catalog through the
/// repository, and only then adopts the copy, so the working copy never runs
/// ahead of the store. Mutations are serialized so each one completes before
/// the next starts.
pub struct SessionController {
    clock: Clock,
    options: SessionOptions,
    repo: Arc<dyn CatalogRepository>,
    state: Mutex<SessionState>,
    write_gate: tokio::sync::Mutex<()>,
}

impl SessionController {
    /// Load the catalog once and start a session with nothing selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the catalog cannot be loaded.
    pub async fn start(
        clock: Clock,
        repo: Arc<dyn CatalogRepository>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let catalog = repo.load().await?;
        info!(courses = catalog.course_count(), "session started");
        Ok(Self {
            clock,
            options,
            repo,
            state: Mutex::new(SessionState {
                catalog,
                selected: None,
                delete_pending: false,
            }),
            write_gate: tokio::sync::Mutex::new(()),
        })
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>, SessionError> {
        self.state
            .lock()
            .map_err(|e| SessionError::StatePoisoned(e.to_string()))
    }

    /// Copy of the working catalog to apply a mutation to.
    fn draft(&self) -> Result<Catalog, SessionError> {
        Ok(self.lock_state()?.catalog.clone())
    }

    /// Save `draft`, then make it the working copy and run `adopt` on the
    /// state. On a failed save the working copy is left untouched.
    /// Callers must hold the write gate.
    async fn commit(
        &self,
        mut draft: Catalog,
        adopt: impl FnOnce(&mut SessionState),
    ) -> Result<(), SessionError> {
        if self.options.record_streak {
            draft.mark_active(self.clock.today());
        }
        self.repo.save(&draft).await?;
        let mut state = self.lock_state()?;
        state.catalog = draft;
        adopt(&mut state);
        Ok(())
    }

    /// Read-only copy of the session for rendering.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StatePoisoned` if the state lock is poisoned.
    pub fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let state = self.lock_state()?;
        Ok(SessionSnapshot {
            catalog: state.catalog.clone(),
            selected_course: state.effective_selection().map(str::to_owned),
            delete_pending: state.delete_pending,
        })
    }

    /// The currently shown course, defaulting to the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StatePoisoned` if the state lock is poisoned.
    pub fn selected_course(&self) -> Result<Option<String>, SessionError> {
        let state = self.lock_state()?;
        Ok(state.effective_selection().map(str::to_owned))
    }

    /// Create or overwrite a course from a title and newline-delimited lessons.
    ///
    /// An empty title or a blank lesson list is ignored and reported as
    /// `Refresh::Unchanged`. On success the new course becomes selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the catalog cannot be saved.
    pub async fn add_course(&self, title: &str, lesson_lines: &str) -> Result<Refresh, SessionError> {
        let Ok(course) = NewCourse::parse(title, lesson_lines) else {
            debug!("add course ignored: empty title or lesson list");
            return Ok(Refresh::Unchanged);
        };

        let _gate = self.write_gate.lock().await;
        let mut draft = self.draft()?;
        let title = course.title().to_owned();
        let lessons = course.lessons().len();
        let replaced = draft.insert_course(course).is_some();
        self.commit(draft, |state| state.selected = Some(title.clone()))
            .await?;
        info!(course = %title, lessons, replaced, "course added");
        Ok(Refresh::Changed)
    }

    /// Show `title` in the main view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCourse` if no course has that title.
    pub fn select_course(&self, title: &str) -> Result<Refresh, SessionError> {
        let mut state = self.lock_state()?;
        if !state.catalog.contains(title) {
            return Err(SessionError::UnknownCourse(title.to_owned()));
        }
        if state.selected.as_deref() == Some(title) {
            return Ok(Refresh::Unchanged);
        }
        state.selected = Some(title.to_owned());
        Ok(Refresh::Changed)
    }

    /// Archive the selected course.
    ///
    /// Archiving removes the course from the catalog, exactly like a
    /// confirmed delete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when there are no courses and
    /// `SessionError::Storage` if the catalog cannot be saved.
    pub async fn archive_course(&self) -> Result<Refresh, SessionError> {
        let _gate = self.write_gate.lock().await;
        let title = self.remove_selected().await?;
        info!(course = %title, "course archived");
        Ok(Refresh::Changed)
    }

    /// Ask for confirmation before permanently deleting the selected course.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when there is nothing to delete.
    pub fn request_delete(&self) -> Result<Refresh, SessionError> {
        let mut state = self.lock_state()?;
        if state.effective_selection().is_none() {
            return Err(SessionError::NoSelection);
        }
        if state.delete_pending {
            return Ok(Refresh::Unchanged);
        }
        state.delete_pending = true;
        Ok(Refresh::Changed)
    }

    /// Dismiss a pending delete confirmation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StatePoisoned` if the state lock is poisoned.
    pub fn cancel_delete(&self) -> Result<Refresh, SessionError> {
        let mut state = self.lock_state()?;
        if !state.delete_pending {
            return Ok(Refresh::Unchanged);
        }
        state.delete_pending = false;
        Ok(Refresh::Changed)
    }

    /// Delete the selected course after `request_delete`.
    ///
    /// Without a pending request this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when there are no courses and
    /// `SessionError::Storage` if the catalog cannot be saved.
    pub async fn confirm_delete(&self) -> Result<Refresh, SessionError> {
        let _gate = self.write_gate.lock().await;
        if !self.lock_state()?.delete_pending {
            return Ok(Refresh::Unchanged);
        }
        let title = self.remove_selected().await?;
        info!(course = %title, "course deleted");
        Ok(Refresh::Changed)
    }

    /// Remove the shown course from the store, then clear the selection.
    /// Callers must hold the write gate.
    async fn remove_selected(&self) -> Result<String, SessionError> {
        let (title, mut draft) = {
            let state = self.lock_state()?;
            let title = state
                .effective_selection()
                .map(str::to_owned)
                .ok_or(SessionError::NoSelection)?;
            (title, state.catalog.clone())
        };
        draft.remove_course(&title);
        self.commit(draft, |state| {
            state.selected = None;
            state.delete_pending = false;
        })
        .await?;
        Ok(title)
    }

    /// Change one field of one lesson and persist the whole catalog.
    ///
    /// Edits that leave the value unchanged are not persisted.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCourse`, `SessionError::Lesson` for an
    /// out-of-range index, or `SessionError::Storage` if saving fails.
    pub async fn update_lesson(
        &self,
        course: &str,
        index: usize,
        edit: LessonEdit,
    ) -> Result<Refresh, SessionError> {
        let _gate = self.write_gate.lock().await;
        let field = edit.field_name();
        let mut draft = self.draft()?;
        if !draft.edit_lesson(course, index, edit)? {
            return Ok(Refresh::Unchanged);
        }
        self.commit(draft, |_| {}).await?;
        info!(course, index, field, "lesson updated");
        Ok(Refresh::Changed)
    }

    /// Progress counts and weighted score for `course`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCourse` if no course has that title.
    pub fn progress(&self, course: &str) -> Result<Progress, SessionError> {
        let state = self.lock_state()?;
        let lessons = state
            .catalog
            .course(course)
            .ok_or_else(|| SessionError::UnknownCourse(course.to_owned()))?;
        Ok(Progress::from_lessons(lessons))
    }

    /// Completed lessons of `course` that carry a note.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCourse` if no course has that title.
    pub fn completed_notes(&self, course: &str) -> Result<Vec<CompletedNote>, SessionError> {
        let state = self.lock_state()?;
        let lessons = state
            .catalog
            .course(course)
            .ok_or_else(|| SessionError::UnknownCourse(course.to_owned()))?;
        Ok(completed_notes(lessons).map(CompletedNote::from).collect())
    }

    /// Render `course` as a CSV download.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownCourse` if no course has that title, or
    /// `SessionError::Export` if encoding fails.
    pub fn export_csv(&self, course: &str) -> Result<CsvExport, SessionError> {
        let state = self.lock_state()?;
        let lessons = state
            .catalog
            .course(course)
            .ok_or_else(|| SessionError::UnknownCourse(course.to_owned()))?;
        Ok(render_course_csv(course, lessons)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use progress_core::time::fixed_clock;
    use storage::{InMemoryRepository, StorageError};

    async fn start(repo: &InMemoryRepository) -> SessionController {
        SessionController::start(fixed_clock(), Arc::new(repo.clone()), SessionOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn add_course_selects_and_persists() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;

        let refresh = session
            .add_course("Algebra", "Intro\nEquations\nGraphs")
            .await
            .unwrap();
        assert_eq!(refresh, Refresh::Changed);
        assert_eq!(session.selected_course().unwrap().as_deref(), Some("Algebra"));

        let stored = repo.load().await.unwrap();
        let lessons = stored.course("Algebra").unwrap();
        assert_eq!(lessons.len(), 3);
        assert!(lessons.iter().all(|l| !l.completed() && !l.needs_revision()));
        assert!(lessons.iter().all(|l| l.what_learned().is_empty()));
        assert!(stored.streak_days().next().is_none());
    }

    #[tokio::test]
    async fn invalid_submission_is_a_silent_no_op() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;

        assert_eq!(session.add_course("", "A").await.unwrap(), Refresh::Unchanged);
        assert_eq!(session.add_course("X", "  \n").await.unwrap(), Refresh::Unchanged);
        assert!(session.snapshot().unwrap().catalog.is_empty());
        assert_eq!(repo.save_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn selection_defaults_to_first_course() {
        let mut catalog = Catalog::new();
        catalog.insert_course(NewCourse::parse("First", "a").unwrap());
        catalog.insert_course(NewCourse::parse("Second", "b").unwrap());
        let repo = InMemoryRepository::with_catalog(catalog);
        let session = start(&repo).await;

        assert_eq!(session.selected_course().unwrap().as_deref(), Some("First"));
        assert_eq!(session.select_course("Second").unwrap(), Refresh::Changed);
        assert_eq!(session.select_course("Second").unwrap(), Refresh::Unchanged);
        assert!(matches!(
            session.select_course("Missing"),
            Err(SessionError::UnknownCourse(title)) if title == "Missing"
        ));
        assert_eq!(session.selected_course().unwrap().as_deref(), Some("Second"));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;
        session.add_course("Algebra", "Intro").await.unwrap();

        assert_eq!(session.confirm_delete().await.unwrap(), Refresh::Unchanged);
        assert_eq!(session.request_delete().unwrap(), Refresh::Changed);
        assert_eq!(session.cancel_delete().unwrap(), Refresh::Changed);
        assert_eq!(session.confirm_delete().await.unwrap(), Refresh::Unchanged);
        assert!(repo.load().await.unwrap().contains("Algebra"));

        session.request_delete().unwrap();
        assert!(session.snapshot().unwrap().delete_pending);
        assert_eq!(session.confirm_delete().await.unwrap(), Refresh::Changed);

        let snapshot = session.snapshot().unwrap();
        assert!(!snapshot.delete_pending);
        assert!(snapshot.selected_course.is_none());
        assert!(!repo.load().await.unwrap().contains("Algebra"));
    }

    #[tokio::test]
    async fn archive_removes_selected_course() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;
        session.add_course("Keep", "a").await.unwrap();
        session.add_course("Drop", "b").await.unwrap();

        session.archive_course().await.unwrap();
        let stored = repo.load().await.unwrap();
        assert!(!stored.contains("Drop"));
        assert!(stored.contains("Keep"));
        // Selection was cleared; the view falls back to the first course.
        assert_eq!(session.selected_course().unwrap().as_deref(), Some("Keep"));
    }

    #[tokio::test]
    async fn archive_with_no_courses_reports_no_selection() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;
        assert!(matches!(
            session.archive_course().await,
            Err(SessionError::NoSelection)
        ));
        assert!(matches!(session.request_delete(), Err(SessionError::NoSelection)));
    }

    #[tokio::test]
    async fn unchanged_edit_skips_save() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;
        session.add_course("Algebra", "Intro").await.unwrap();
        let saves = repo.save_count().unwrap();

        let refresh = session
            .update_lesson("Algebra", 0, LessonEdit::Completed(false))
            .await
            .unwrap();
        assert_eq!(refresh, Refresh::Unchanged);
        assert_eq!(repo.save_count().unwrap(), saves);

        session
            .update_lesson("Algebra", 0, LessonEdit::WhatLearned("x".into()))
            .await
            .unwrap();
        assert_eq!(repo.save_count().unwrap(), saves + 1);
    }

    #[tokio::test]
    async fn update_rejects_unknown_course_and_index() {
        let repo = InMemoryRepository::new();
        let session = start(&repo).await;
        session.add_course("Algebra", "Intro").await.unwrap();

        assert!(matches!(
            session
                .update_lesson("Nope", 0, LessonEdit::Completed(true))
                .await,
            Err(SessionError::UnknownCourse(_))
        ));
        assert!(matches!(
            session
                .update_lesson("Algebra", 5, LessonEdit::Completed(true))
                .await,
            Err(SessionError::Lesson(_))
        ));
    }

    #[tokio::test]
    async fn record_streak_marks_today_on_save() {
        let repo = InMemoryRepository::new();
        let session = SessionController::start(
            fixed_clock(),
            Arc::new(repo.clone()),
            SessionOptions {
                record_streak: true,
            },
        )
        .await
        .unwrap();
        session.add_course("Algebra", "Intro").await.unwrap();

        let stored = repo.load().await.unwrap();
        assert_eq!(stored.streak_days().collect::<Vec<_>>(), vec!["2023-11-14"]);
    }

    /// Loads `catalog` but rejects every save.
    #[derive(Default)]
    struct FailingRepo {
        catalog: Catalog,
    }

    #[async_trait::async_trait]
    impl CatalogRepository for FailingRepo {
        async fn load(&self) -> Result<Catalog, StorageError> {
            Ok(self.catalog.clone())
        }

        async fn save(&self, _catalog: &Catalog) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn save_failure_propagates() {
        let session =
            SessionController::start(fixed_clock(), Arc::new(FailingRepo::default()), SessionOptions::default())
                .await
                .unwrap();
        let err = session.add_course("Algebra", "Intro").await.unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)), "{err}");
    }

    #[tokio::test]
    async fn failed_save_leaves_working_copy_unchanged() {
        let mut catalog = Catalog::new();
        catalog.insert_course(NewCourse::parse("Keep", "Intro\nGraphs").unwrap());
        let repo = FailingRepo { catalog };
        let session = SessionController::start(
            fixed_clock(),
            Arc::new(repo),
            SessionOptions {
                record_streak: true,
            },
        )
        .await
        .unwrap();
        let before = session.snapshot().unwrap().catalog;

        session.request_delete().unwrap();
        let err = session.confirm_delete().await.unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)), "{err}");
        let after = session.snapshot().unwrap();
        assert_eq!(after.catalog, before);
        assert_eq!(after.selected_course.as_deref(), Some("Keep"));
        assert!(after.delete_pending);

        assert!(session.archive_course().await.is_err());
        assert!(session.add_course("New", "x").await.is_err());
        assert!(
            session
                .update_lesson("Keep", 0, LessonEdit::Completed(true))
                .await
                .is_err()
        );

        let after = session.snapshot().unwrap();
        assert_eq!(after.catalog, before);
        assert!(!after.catalog.contains("New"));
        assert!(after.catalog.streak_days().next().is_none());
        assert_eq!(after.selected_course.as_deref(), Some("Keep"));
    }
}
