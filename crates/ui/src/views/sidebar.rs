use dioxus::prelude::*;
use services::Refresh;

use crate::context::{AppContext, RefreshHandle};
use crate::vm::map_course_options;

#[component]
pub fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let mut refresh = use_context::<RefreshHandle>();
    refresh.track();

    let snapshot = match ctx.session().snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            return rsx! {
                nav { class: "sidebar",
                    p { class: "sidebar-error", "{err}" }
                }
            };
        }
    };
    let options = map_course_options(&snapshot);
    let delete_pending = snapshot.delete_pending;

    let select_ctx = ctx.clone();
    let archive_ctx = ctx.clone();
    let request_ctx = ctx.clone();
    let cancel_ctx = ctx.clone();
    let confirm_ctx = ctx.clone();

    rsx! {
        nav { class: "sidebar",
            h1 { "Learning Dashboard" }

            h2 { class: "sidebar-heading", "Courses" }
            AddCourseForm {}

            if !options.is_empty() {
                h2 { class: "sidebar-heading", "Select Course" }
                label { class: "sidebar-label", "Your Courses" }
                select {
                    class: "course-select",
                    onchange: move |evt| {
                        let outcome = select_ctx.session().select_course(&evt.value());
                        refresh.apply(outcome);
                    },
                    for course in options {
                        option {
                            key: "{course.title}",
                            value: "{course.title}",
                            selected: course.selected,
                            "{course.title}"
                        }
                    }
                }

                div { class: "sidebar-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| {
                            let session = archive_ctx.session();
                            let mut refresh = refresh;
                            spawn(async move {
                                let outcome = session.archive_course().await;
                                refresh.apply(outcome);
                            });
                        },
                        "Archive Course"
                    }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: move |_| {
                            let outcome = request_ctx.session().request_delete();
                            refresh.apply(outcome);
                        },
                        "Delete Course (Permanent)"
                    }
                }

                if delete_pending {
                    div { class: "sidebar-warning", role: "alert",
                        p { "This will permanently delete the selected course and all its lessons." }
                        div { class: "sidebar-confirm",
                            button {
                                class: "btn",
                                r#type: "button",
                                onclick: move |_| {
                                    let outcome = cancel_ctx.session().cancel_delete();
                                    refresh.apply(outcome);
                                },
                                "Cancel"
                            }
                            button {
                                class: "btn btn-danger",
                                r#type: "button",
                                onclick: move |_| {
                                    let session = confirm_ctx.session();
                                    let mut refresh = refresh;
                                    spawn(async move {
                                        let outcome = session.confirm_delete().await;
                                        refresh.apply(outcome);
                                    });
                                },
                                "Yes, delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AddCourseForm() -> Element {
    let ctx = use_context::<AppContext>();
    let refresh = use_context::<RefreshHandle>();
    let mut title = use_signal(String::new);
    let mut lessons = use_signal(String::new);
    let show_hint = use_signal(|| false);

    let submit = move |_: MouseEvent| {
        let session = ctx.session();
        let title_value = title.read().clone();
        let lessons_value = lessons.read().clone();
        let mut title = title;
        let mut lessons = lessons;
        let mut show_hint = show_hint;
        let mut refresh = refresh;
        spawn(async move {
            let outcome = session.add_course(&title_value, &lessons_value).await;
            match outcome {
                Ok(Refresh::Changed) => {
                    title.set(String::new());
                    lessons.set(String::new());
                    show_hint.set(false);
                }
                Ok(Refresh::Unchanged) => show_hint.set(true),
                Err(_) => {}
            }
            refresh.apply(outcome);
        });
    };

    rsx! {
        div { class: "add-course",
            label { class: "sidebar-label", "Course Title" }
            input {
                class: "add-course-title",
                r#type: "text",
                value: "{title.read()}",
                oninput: move |evt| title.set(evt.value()),
            }
            label { class: "sidebar-label", "Lessons (one per line)" }
            textarea {
                class: "add-course-lessons",
                rows: 8,
                value: "{lessons.read()}",
                oninput: move |evt| lessons.set(evt.value()),
            }
            if show_hint() {
                p { class: "add-course-hint", "Enter a title and at least one lesson." }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: submit,
                "Add Course"
            }
        }
    }
}
