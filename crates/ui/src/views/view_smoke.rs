use progress_core::model::{Catalog, LessonEdit};
use storage::CatalogRepository;

use super::test_harness::{ViewKind, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_empty_state() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, Catalog::new()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Start by adding and selecting a course from the sidebar."),
        "missing empty state in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_course_progress() {
    let mut harness = setup_view_harness(ViewKind::Dashboard, Catalog::new()).await;
    let session = harness.session.clone();
    session
        .add_course("Algebra", "Intro\nEquations\nGraphs")
        .await
        .expect("add course");
    session
        .update_lesson("Algebra", 0, LessonEdit::Completed(true))
        .await
        .expect("complete");
    session
        .update_lesson("Algebra", 0, LessonEdit::WhatLearned("number lines".into()))
        .await
        .expect("note");
    session
        .update_lesson("Algebra", 1, LessonEdit::NeedsRevision(true))
        .await
        .expect("revise");

    harness.rebuild();
    let html = harness.render();
    for expected in [
        "Algebra",
        "Lesson 1 Name",
        "Lesson 3 Name",
        "Summary of Completed Lessons",
        "number lines",
        "1/3 lessons completed (+1 needing revision)",
        "Completed: 33.3% (1)",
        "Needs Revision: 33.3% (1)",
        "Download CSV",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains("width: 50%;"), "missing progress width in {html}");

    let stored = harness.repo.load().await.expect("load");
    assert!(stored.course("Algebra").expect("course")[1].needs_revision());
}

#[tokio::test(flavor = "current_thread")]
async fn sidebar_smoke_hides_selection_without_courses() {
    let mut harness = setup_view_harness(ViewKind::Sidebar, Catalog::new()).await;
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Add Course"), "missing form in {html}");
    assert!(!html.contains("Select Course"), "unexpected selector in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn sidebar_smoke_renders_delete_confirmation() {
    let mut harness = setup_view_harness(ViewKind::Sidebar, Catalog::new()).await;
    harness
        .session
        .add_course("Biology", "Cells")
        .await
        .expect("add course");
    harness.session.request_delete().expect("request delete");

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Select Course"), "missing selector in {html}");
    assert!(html.contains("Biology"), "missing course option in {html}");
    assert!(
        html.contains("This will permanently delete the selected course"),
        "missing warning in {html}"
    );
    assert!(html.contains("Yes, delete"), "missing confirm in {html}");
}
