//! Step navigation state machine.
//!
//! The controller owns the current-step pointer and the visited set, and
//! derives completion and progress from the draft on demand. All transitions
//! pass through the validation gate; invalid targets are silent no-ops
//! rather than errors, since callers only offer valid transitions.

use std::collections::BTreeSet;

use crate::models::PropertyDraft;

use super::steps::{STEP_COUNT, StepKey};
use super::validation::check_step;

/// Navigation policy. Backward movement is always allowed; forward movement
/// is restricted to the immediate next step unless `allow_skip` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationPolicy {
    pub allow_skip: bool,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    current: StepKey,
    visited: BTreeSet<StepKey>,
    policy: NavigationPolicy,
}

impl NavigationController {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            current: StepKey::General,
            visited: BTreeSet::from([StepKey::General]),
            policy,
        }
    }

    pub fn current(&self) -> StepKey {
        self.current
    }

    /// Steps seen so far. Grows monotonically within a session.
    pub fn visited(&self) -> &BTreeSet<StepKey> {
        &self.visited
    }

    pub fn is_visited(
        &self,
        step: StepKey,
    ) -> bool {
        self.visited.contains(&step)
    }

    /// Steps that are both visited and currently satisfied. Recomputed from
    /// the draft every call, so it always reflects the latest form state.
    pub fn completed(
        &self,
        draft: &PropertyDraft,
    ) -> BTreeSet<StepKey> {
        self.visited
            .iter()
            .copied()
            .filter(|step| check_step(*step, draft).is_satisfied())
            .collect()
    }

    pub fn progress_percent(
        &self,
        draft: &PropertyDraft,
    ) -> u8 {
        let completed = self.completed(draft).len();
        (completed as f64 * 100.0 / STEP_COUNT as f64).round() as u8
    }

    pub fn can_go_to(
        &self,
        target: StepKey,
        draft: &PropertyDraft,
    ) -> bool {
        let current_id = self.current.id();
        let target_id = target.id();

        if target_id <= current_id {
            return true;
        }
        if target_id > current_id + 1 && !self.policy.allow_skip {
            return false;
        }
        check_step(self.current, draft).is_satisfied()
    }

    /// Attempt a transition to `target`. Returns `false` with no state
    /// change when the move is not permitted.
    pub fn go_to(
        &mut self,
        target: StepKey,
        draft: &PropertyDraft,
    ) -> bool {
        if !self.can_go_to(target, draft) {
            return false;
        }
        self.current = target;
        self.visited.insert(target);
        true
    }

    /// Id-based transition. Out-of-range ids are rejected without state
    /// change.
    pub fn go_to_id(
        &mut self,
        target: usize,
        draft: &PropertyDraft,
    ) -> bool {
        match StepKey::from_id(target) {
            Some(step) => self.go_to(step, draft),
            None => false,
        }
    }

    pub fn can_go_next(
        &self,
        draft: &PropertyDraft,
    ) -> bool {
        self.current
            .next()
            .is_some_and(|next| self.can_go_to(next, draft))
    }

    pub fn can_go_prev(&self) -> bool {
        self.current.prev().is_some()
    }

    pub fn next(
        &mut self,
        draft: &PropertyDraft,
    ) -> bool {
        match self.current.next() {
            Some(step) => self.go_to(step, draft),
            None => false,
        }
    }

    pub fn prev(
        &mut self,
        draft: &PropertyDraft,
    ) -> bool {
        match self.current.prev() {
            Some(step) => self.go_to(step, draft),
            None => false,
        }
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new(NavigationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{LifecycleTag, PropertyCategory, PropertyDraft, SaleTerms};

    use super::*;

    /// A draft that satisfies every step (no services, no states).
    fn satisfiable_draft() -> PropertyDraft {
        PropertyDraft::new("Casa X", PropertyCategory::House)
    }

    #[test]
    fn initial_state_is_step_one_visited() {
        let nav = NavigationController::default();

        assert_eq!(nav.current(), StepKey::General);
        assert_eq!(nav.visited(), &BTreeSet::from([StepKey::General]));
    }

    #[test]
    fn out_of_range_targets_are_rejected_without_state_change() {
        let draft = satisfiable_draft();
        let mut nav = NavigationController::default();

        assert!(!nav.go_to_id(0, &draft));
        assert!(!nav.go_to_id(6, &draft));
        assert!(!nav.go_to_id(usize::MAX, &draft));
        assert_eq!(nav.current(), StepKey::General);
    }

    #[test]
    fn forward_blocked_while_current_step_unsatisfied() {
        let draft = PropertyDraft::default(); // empty name
        let mut nav = NavigationController::default();

        assert!(!nav.can_go_next(&draft));
        assert!(!nav.next(&draft));
        assert_eq!(nav.current(), StepKey::General);
    }

    #[test]
    fn forward_skip_rejected_without_policy() {
        let draft = satisfiable_draft();
        let mut nav = NavigationController::default();

        assert!(!nav.go_to(StepKey::Conditions, &draft));
        assert_eq!(nav.current(), StepKey::General);
    }

    #[test]
    fn forward_skip_allowed_with_policy() {
        let draft = satisfiable_draft();
        let mut nav = NavigationController::new(NavigationPolicy { allow_skip: true });

        assert!(nav.go_to(StepKey::Services, &draft));
        assert_eq!(nav.current(), StepKey::Services);
    }

    #[test]
    fn skip_still_requires_current_step_satisfied() {
        let draft = PropertyDraft::default(); // empty name
        let mut nav = NavigationController::new(NavigationPolicy { allow_skip: true });

        assert!(!nav.go_to(StepKey::Services, &draft));
    }

    #[test]
    fn backward_always_allowed() {
        let mut draft = satisfiable_draft();
        let mut nav = NavigationController::default();
        assert!(nav.next(&draft));

        // Break the general step, then go back anyway.
        draft.name.clear();
        assert!(nav.prev(&draft));
        assert_eq!(nav.current(), StepKey::General);
    }

    #[test]
    fn next_reaches_last_step_in_exactly_n_minus_one_calls() {
        let draft = satisfiable_draft();
        let mut nav = NavigationController::default();

        for _ in 0..STEP_COUNT - 1 {
            assert!(nav.next(&draft));
        }
        assert_eq!(nav.current(), StepKey::Services);

        // A further call is a no-op.
        assert!(!nav.next(&draft));
        assert_eq!(nav.current(), StepKey::Services);
    }

    #[test]
    fn visited_set_grows_monotonically() {
        let draft = satisfiable_draft();
        let mut nav = NavigationController::default();

        nav.next(&draft);
        nav.next(&draft);
        nav.prev(&draft);
        nav.prev(&draft);

        assert_eq!(
            nav.visited(),
            &BTreeSet::from([StepKey::General, StepKey::Location, StepKey::Conditions])
        );
    }

    #[test]
    fn completed_is_subset_of_visited() {
        let mut draft = satisfiable_draft();
        draft.states.insert(LifecycleTag::ForSale); // conditions now unsatisfied
        let mut nav = NavigationController::new(NavigationPolicy { allow_skip: true });
        nav.go_to(StepKey::Spaces, &draft);

        let completed = nav.completed(&draft);
        assert!(completed.is_subset(nav.visited()));
        assert!(!completed.contains(&StepKey::Conditions));
    }

    #[test]
    fn progress_tracks_completed_share() {
        let mut draft = satisfiable_draft();
        draft.states.insert(LifecycleTag::ForSale);
        let mut nav = NavigationController::new(NavigationPolicy { allow_skip: true });

        // Visited: general. 1/5 complete.
        assert_eq!(nav.progress_percent(&draft), 20);

        nav.go_to(StepKey::Location, &draft);
        nav.go_to(StepKey::Conditions, &draft);
        // Conditions visited but unsatisfied: still 2/5.
        assert_eq!(nav.progress_percent(&draft), 40);

        // Satisfying the sale terms flips conditions to complete reactively.
        draft.conditions.sale = Some(SaleTerms {
            asking_price: dec!(3500000),
            negotiable: false,
        });
        assert_eq!(nav.progress_percent(&draft), 60);
    }
}
