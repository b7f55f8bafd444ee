use services::SessionSnapshot;

/// UI-ready representation of a course for the selection control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseOptionVm {
    pub title: String,
    pub selected: bool,
}

/// Convert the catalog into select options, flagging the shown course.
#[must_use]
pub fn map_course_options(snapshot: &SessionSnapshot) -> Vec<CourseOptionVm> {
    let selected = snapshot.selected_course.as_deref();
    snapshot
        .catalog
        .course_titles()
        .map(|title| CourseOptionVm {
            title: title.to_owned(),
            selected: Some(title) == selected,
        })
        .collect()
}
