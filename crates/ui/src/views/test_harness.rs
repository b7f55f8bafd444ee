use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use progress_core::model::Catalog;
use progress_core::time::fixed_clock;
use services::{SessionController, SessionOptions};
use storage::InMemoryRepository;

use crate::context::{RefreshHandle, UiApp, build_app_context};
use crate::views::{DashboardView, ErrorBanner, Sidebar};

struct TestApp {
    session: Arc<SessionController>,
}

impl UiApp for TestApp {
    fn session(&self) -> Arc<SessionController> {
        Arc::clone(&self.session)
    }

    fn export_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Sidebar,
    Dashboard,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[allow(non_snake_case)]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(RefreshHandle::new);

    match props.view {
        ViewKind::Sidebar => rsx! { Sidebar {} },
        ViewKind::Dashboard => rsx! {
            ErrorBanner {}
            DashboardView {}
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub session: Arc<SessionController>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Start a session over `catalog` and mount `view` with its contexts.
///
/// Session actions may be run on `harness.session` before `rebuild`.
pub async fn setup_view_harness(view: ViewKind, catalog: Catalog) -> ViewHarness {
    let repo = InMemoryRepository::with_catalog(catalog);
    let session = Arc::new(
        SessionController::start(fixed_clock(), Arc::new(repo.clone()), SessionOptions::default())
            .await
            .expect("start session"),
    );
    let app = Arc::new(TestApp {
        session: Arc::clone(&session),
    });

    let dom = VirtualDom::new_with_props(ViewHarnessRoot, ViewHarnessProps { app, view });

    ViewHarness { dom, repo, session }
}
