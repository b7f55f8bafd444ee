use std::f64::consts::PI;

use progress_core::Progress;
use progress_core::progress::{BreakdownSlice, SliceKind};

/// Pie geometry in SVG user units.
pub const PIE_CENTER: f64 = 50.0;
pub const PIE_RADIUS: f64 = 45.0;

/// First wedge starts at twelve o'clock and wedges run counter-clockwise.
const START_ANGLE_DEG: f64 = 90.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressVm {
    pub completed: usize,
    pub needs_revision: usize,
    pub total: usize,
    /// Whole-number percentage for the progress bar width.
    pub percent: u32,
    pub slices: Vec<PieSliceVm>,
}

/// One drawable wedge; empty wedges are omitted.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSliceVm {
    pub label: &'static str,
    pub class: &'static str,
    pub count: usize,
    pub percent_label: String,
    pub path: String,
}

impl ProgressVm {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_progress(progress: &Progress) -> Self {
        let mut start = START_ANGLE_DEG;
        let mut slices = Vec::new();
        for slice in progress.breakdown() {
            if slice.count == 0 {
                continue;
            }
            let sweep = slice.fraction * 360.0;
            slices.push(PieSliceVm {
                label: slice.kind.label(),
                class: slice_class(slice.kind),
                count: slice.count,
                percent_label: slice.percent_label(),
                path: wedge_path(start, sweep, &slice),
            });
            start += sweep;
        }

        Self {
            completed: progress.completed,
            needs_revision: progress.needs_revision,
            total: progress.total,
            percent: (progress.score * 100.0).round() as u32,
            slices,
        }
    }

    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} lessons completed (+{} needing revision)",
            self.completed, self.total, self.needs_revision
        )
    }
}

fn slice_class(kind: SliceKind) -> &'static str {
    match kind {
        SliceKind::Completed => "pie-slice pie-slice--completed",
        SliceKind::NeedsRevision => "pie-slice pie-slice--revision",
        SliceKind::Remaining => "pie-slice pie-slice--remaining",
    }
}

fn point_at(angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg * PI / 180.0;
    // SVG y grows downwards.
    (
        PIE_CENTER + PIE_RADIUS * rad.cos(),
        PIE_CENTER - PIE_RADIUS * rad.sin(),
    )
}

fn wedge_path(start_deg: f64, sweep_deg: f64, slice: &BreakdownSlice) -> String {
    let (x0, y0) = point_at(start_deg);
    if slice.fraction >= 1.0 {
        // A single arc cannot close on itself; draw the full disc as two halves.
        let (x1, y1) = point_at(start_deg + 180.0);
        return format!(
            "M {x0:.3} {y0:.3} A {r} {r} 0 1 0 {x1:.3} {y1:.3} A {r} {r} 0 1 0 {x0:.3} {y0:.3} Z",
            r = PIE_RADIUS
        );
    }
    let (x1, y1) = point_at(start_deg + sweep_deg);
    let large_arc = u8::from(sweep_deg > 180.0);
    format!(
        "M {c} {c} L {x0:.3} {y0:.3} A {r} {r} 0 {large_arc} 0 {x1:.3} {y1:.3} Z",
        c = PIE_CENTER,
        r = PIE_RADIUS
    )
}
