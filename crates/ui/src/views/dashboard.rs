use dioxus::prelude::*;
use progress_core::model::LessonEdit;

use crate::context::{AppContext, RefreshHandle};
use crate::vm::{LessonRowVm, PieSliceVm, ProgressVm, map_lesson_rows};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<RefreshHandle>();
    refresh.track();

    let snapshot = match ctx.session().snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            return rsx! {
                div { class: "page",
                    p { class: "error", "{err}" }
                }
            };
        }
    };

    let (Some(course), Some(lessons)) = (
        snapshot.selected_course.clone(),
        snapshot.selected_lessons(),
    ) else {
        return rsx! {
            div { class: "page",
                p { class: "info", "Start by adding and selecting a course from the sidebar." }
            }
        };
    };

    let session = ctx.session();
    let (progress, notes) = match (session.progress(&course), session.completed_notes(&course)) {
        (Ok(progress), Ok(notes)) => (ProgressVm::from_progress(&progress), notes),
        (Err(err), _) | (_, Err(err)) => {
            return rsx! {
                div { class: "page",
                    p { class: "error", "{err}" }
                }
            };
        }
    };
    let rows = map_lesson_rows(lessons);

    rsx! {
        div { class: "page",
            h2 { class: "course-title", "{course}" }

            section { class: "lessons",
                for row in rows {
                    LessonEditor {
                        key: "{course}-{row.index}",
                        course: course.clone(),
                        row,
                    }
                }
            }

            section { class: "notes",
                h3 { "Summary of Completed Lessons" }
                if notes.is_empty() {
                    p { class: "muted", "Complete a lesson and note what you learned to see it here." }
                }
                for (idx, note) in notes.into_iter().enumerate() {
                    article { key: "{idx}", class: "note",
                        h4 { "{note.lesson}" }
                        p { "{note.what_learned}" }
                    }
                }
            }

            ProgressOverview { progress }
            ExportPanel { course }
        }
    }
}

#[component]
fn LessonEditor(course: String, row: LessonRowVm) -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<RefreshHandle>();
    let index = row.index;

    let edit = use_callback(move |edit: LessonEdit| {
        let session = ctx.session();
        let course = course.clone();
        let mut refresh = refresh;
        spawn(async move {
            let outcome = session.update_lesson(&course, index, edit).await;
            refresh.apply(outcome);
        });
    });

    let completed = row.completed;
    let needs_revision = row.needs_revision;

    rsx! {
        div { class: "lesson",
            label { class: "lesson-label", "{row.name_label}" }
            input {
                class: "lesson-name",
                r#type: "text",
                value: "{row.name}",
                oninput: move |evt| edit.call(LessonEdit::Name(evt.value())),
            }
            div { class: "lesson-flags",
                button {
                    class: "lesson-toggle",
                    r#type: "button",
                    role: "switch",
                    aria_checked: "{completed}",
                    onclick: move |_| edit.call(LessonEdit::Completed(!completed)),
                    "Completed"
                }
                button {
                    class: "lesson-toggle",
                    r#type: "button",
                    role: "switch",
                    aria_checked: "{needs_revision}",
                    onclick: move |_| edit.call(LessonEdit::NeedsRevision(!needs_revision)),
                    "Needs Revision"
                }
            }
            label { class: "lesson-label", "What I Learned" }
            textarea {
                class: "lesson-note",
                rows: 3,
                value: "{row.what_learned}",
                oninput: move |evt| edit.call(LessonEdit::WhatLearned(evt.value())),
            }
        }
    }
}

#[component]
fn ProgressOverview(progress: ProgressVm) -> Element {
    let summary = progress.summary_line();

    rsx! {
        section { class: "progress",
            h3 { "Progress Overview" }
            div { class: "progress-bar",
                div { class: "progress-bar__fill", style: "width: {progress.percent}%;" }
            }
            p { class: "progress-summary", "{summary}" }
            if !progress.slices.is_empty() {
                PieChart { slices: progress.slices.clone() }
            }
        }
    }
}

#[component]
fn PieChart(slices: Vec<PieSliceVm>) -> Element {
    rsx! {
        div { class: "pie",
            svg {
                class: "pie-chart",
                view_box: "0 0 100 100",
                for slice in slices.iter() {
                    path { key: "{slice.label}", class: slice.class, d: "{slice.path}" }
                }
            }
            ul { class: "pie-legend",
                for slice in slices.iter() {
                    li { key: "{slice.label}", class: slice.class,
                        "{slice.label}: {slice.percent_label} ({slice.count})"
                    }
                }
            }
        }
    }
}

#[component]
fn ExportPanel(course: String) -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<RefreshHandle>();
    let status = use_signal(|| None::<String>);

    let download = move |_: MouseEvent| {
        let session = ctx.session();
        let export_dir = ctx.export_dir();
        let course = course.clone();
        let mut status = status;
        let mut refresh = refresh;
        spawn(async move {
            let export = match session.export_csv(&course) {
                Ok(export) => export,
                Err(err) => return refresh.fail(&err),
            };
            match export.write_to_dir(&export_dir).await {
                Ok(path) => {
                    tracing::info!(course = %course, path = %path.display(), "exported course");
                    status.set(Some(format!("Saved {}", path.display())));
                }
                Err(err) => refresh.fail(&err),
            }
        });
    };

    rsx! {
        section { class: "export",
            h3 { "Export Progress" }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: download,
                "Download CSV"
            }
            if let Some(message) = status() {
                p { class: "export-status", "{message}" }
            }
        }
    }
}
