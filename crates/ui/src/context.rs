use std::path::PathBuf;
use std::sync::Arc;

use dioxus::prelude::*;
use services::{Refresh, SessionController, SessionError};

pub trait UiApp: Send + Sync {
    fn session(&self) -> Arc<SessionController>;
    fn export_dir(&self) -> PathBuf;
}

#[derive(Clone)]
pub struct AppContext {
    session: Arc<SessionController>,
    export_dir: PathBuf,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            session: app.session(),
            export_dir: app.export_dir(),
        }
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionController> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// Redraw trigger shared by every view that renders session state.
///
/// Views call `track` while rendering; actions feed their outcome to `apply`,
/// which bumps the revision on `Refresh::Changed` and records failures.
#[derive(Clone, Copy, PartialEq)]
pub struct RefreshHandle {
    revision: Signal<u64>,
    error: Signal<Option<String>>,
}

impl RefreshHandle {
    #[must_use]
    pub fn new() -> Self {
        Self {
            revision: Signal::new(0),
            error: Signal::new(None),
        }
    }

    /// Subscribe the calling component to session changes.
    pub fn track(&self) -> u64 {
        *self.revision.read()
    }

    pub fn apply(&mut self, outcome: Result<Refresh, SessionError>) {
        match outcome {
            Ok(Refresh::Changed) => {
                self.error.set(None);
                *self.revision.write() += 1;
            }
            Ok(Refresh::Unchanged) => {}
            Err(err) => self.fail(&err),
        }
    }

    pub fn fail(&mut self, err: &dyn std::error::Error) {
        tracing::warn!(error = %err, "action failed");
        self.error.set(Some(err.to_string()));
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub fn dismiss_error(&mut self) {
        self.error.set(None);
    }
}

impl Default for RefreshHandle {
    fn default() -> Self {
        Self::new()
    }
}
