//! Progress math over a course's lessons.

use crate::model::Lesson;

/// Weight of a lesson flagged for revision in the progress score.
pub const REVISION_WEIGHT: f64 = 0.5;

/// Aggregate progress for one course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub needs_revision: usize,
    pub total: usize,
    /// Weighted completion in `[0, 1]`.
    pub score: f64,
}

impl Progress {
    /// Count flags and compute the weighted score.
    ///
    /// `score = (completed + 0.5 * needs_revision) / total`, clamped to `1.0`
    /// for lessons carrying both flags, and `0.0` for an empty course.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_lessons(lessons: &[Lesson]) -> Self {
        let total = lessons.len();
        let completed = lessons.iter().filter(|l| l.completed()).count();
        let needs_revision = lessons.iter().filter(|l| l.needs_revision()).count();
        let score = if total == 0 {
            0.0
        } else {
            let raw = (completed as f64 + REVISION_WEIGHT * needs_revision as f64) / total as f64;
            raw.clamp(0.0, 1.0)
        };
        Self {
            completed,
            needs_revision,
            total,
            score,
        }
    }

    /// Lessons with neither flag counted, never negative.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total
            .saturating_sub(self.completed)
            .saturating_sub(self.needs_revision)
    }

    /// Pie breakdown: completed, needs revision, remaining.
    #[must_use]
    pub fn breakdown(&self) -> [BreakdownSlice; 3] {
        let remaining = self.remaining();
        let sum = self.completed + self.needs_revision + remaining;
        [
            BreakdownSlice::new(SliceKind::Completed, self.completed, sum),
            BreakdownSlice::new(SliceKind::NeedsRevision, self.needs_revision, sum),
            BreakdownSlice::new(SliceKind::Remaining, remaining, sum),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Completed,
    NeedsRevision,
    Remaining,
}

impl SliceKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SliceKind::Completed => "Completed",
            SliceKind::NeedsRevision => "Needs Revision",
            SliceKind::Remaining => "Remaining",
        }
    }
}

/// One wedge of the progress pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakdownSlice {
    pub kind: SliceKind,
    pub count: usize,
    /// Share of the pie in `[0, 1]`, relative to the sum of all slices.
    pub fraction: f64,
}

impl BreakdownSlice {
    #[allow(clippy::cast_precision_loss)]
    fn new(kind: SliceKind, count: usize, total: usize) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        };
        Self {
            kind,
            count,
            fraction,
        }
    }

    /// One-decimal percentage label, e.g. `33.3%`.
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// Completed lessons that carry a note, in course order.
pub fn completed_notes(lessons: &[Lesson]) -> impl Iterator<Item = &Lesson> {
    lessons
        .iter()
        .filter(|l| l.completed() && !l.what_learned().is_empty())
}
