//! Editable working copy of a week's assignment.

use crate::{Assigner, AssignmentResult, Signup, SignupId, WeekId};

use super::{Destination, MoveOutcome, apply_move_with_outcome};

/// A baseline assignment plus the edited copy an organiser is working on.
///
/// The baseline is the last computed or persisted result. Moves only touch
/// the working copy, so cancelling is a matter of copying the baseline back.
///
/// # Examples
/// ```
/// use carpool_core::{AssignmentResult, Destination, Draft, WeekId};
///
/// let mut draft = Draft::new(WeekId::new("Fall Week 1"), AssignmentResult::empty());
/// draft.apply(&"nobody".into(), &Destination::Unassigned);
/// assert!(!draft.is_dirty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    week: WeekId,
    baseline: AssignmentResult,
    current: AssignmentResult,
}

impl Draft {
    /// Start editing `baseline`.
    #[must_use]
    pub fn new(week: WeekId, baseline: AssignmentResult) -> Self {
        let current = baseline.clone();
        Self {
            week,
            baseline,
            current,
        }
    }

    /// Week being edited.
    #[must_use]
    pub const fn week(&self) -> &WeekId {
        &self.week
    }

    /// Last computed or saved result.
    #[must_use]
    pub const fn baseline(&self) -> &AssignmentResult {
        &self.baseline
    }

    /// Working copy including unsaved moves.
    #[must_use]
    pub const fn current(&self) -> &AssignmentResult {
        &self.current
    }

    /// Whether the working copy differs from the baseline.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.current != self.baseline
    }

    /// Apply one move to the working copy.
    pub fn apply(&mut self, rider: &SignupId, destination: &Destination) -> MoveOutcome {
        let (next, outcome) = apply_move_with_outcome(&self.current, rider, destination);
        self.current = next;
        outcome
    }

    /// Discard every unsaved move.
    pub fn cancel(&mut self) {
        self.current = self.baseline.clone();
    }

    /// Record that the working copy has been persisted.
    pub fn mark_saved(&mut self) {
        self.baseline = self.current.clone();
    }

    /// Recompute from scratch, discarding all manual edits.
    pub fn recompute(&mut self, assigner: &dyn Assigner, signups: &[Signup]) {
        if self.is_dirty() {
            log::info!("recomputing week {}: discarding manual edits", self.week);
        }
        self.baseline = assigner.assign(signups, &self.week);
        self.current = self.baseline.clone();
    }
}
