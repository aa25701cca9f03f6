//! Per-scenario step completion tracking
//!
//! An explicit map-of-sets: scenario id -> set of completed 0-based step
//! indices, plus the at-most-one expanded scenario. Indices are not
//! validated against the scenario at toggle time; stale out-of-range
//! entries are legal and simply contribute nothing to completion math,
//! which is always computed against the live scenario.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::scenario::Scenario;

/// In-memory completion state for one tester.
///
/// Created empty at harness start and never persisted; resetting the
/// embedded application under test does not touch it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressTracker {
    completed: HashMap<String, HashSet<usize>>,
    selected: Option<String>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index` in the scenario's completed set.
    ///
    /// Self-inverse: toggling the same pair twice restores the prior state.
    pub fn toggle_step(&mut self, scenario_id: &str, index: usize) {
        let set = self.completed.entry(scenario_id.to_string()).or_default();
        if !set.insert(index) {
            set.remove(&index);
        }
    }

    /// Expand a scenario, collapsing whichever one was expanded before.
    /// Selecting the currently expanded scenario collapses it.
    pub fn select_scenario(&mut self, scenario_id: &str) {
        if self.selected.as_deref() == Some(scenario_id) {
            self.selected = None;
        } else {
            self.selected = Some(scenario_id.to_string());
        }
    }

    /// Currently expanded scenario id, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_step_completed(&self, scenario_id: &str, index: usize) -> bool {
        self.completed
            .get(scenario_id)
            .is_some_and(|set| set.contains(&index))
    }

    /// Completed steps that still exist on the live scenario.
    pub fn completed_count(&self, scenario: &Scenario) -> usize {
        self.completed
            .get(&scenario.id)
            .map(|set| set.iter().filter(|&&i| i < scenario.steps.len()).count())
            .unwrap_or(0)
    }

    /// Completion percentage against the live step list; 0 for a
    /// zero-step scenario.
    pub fn completion_percent(&self, scenario: &Scenario) -> u8 {
        let total = scenario.steps.len();
        if total == 0 {
            return 0;
        }
        let done = self.completed_count(scenario);
        (100.0 * done as f64 / total as f64).round() as u8
    }

    /// A scenario is complete once every live step is checked off; a
    /// zero-step scenario is never complete.
    pub fn is_complete(&self, scenario: &Scenario) -> bool {
        let total = scenario.steps.len();
        total > 0 && self.completed_count(scenario) >= total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_with_steps(id: &str, steps: &[&str]) -> Scenario {
        let mut s = Scenario::new(id, id);
        s.steps = steps.iter().map(|t| t.to_string()).collect();
        s
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut tracker = ProgressTracker::new();
        let before = tracker.clone();

        tracker.toggle_step("s1", 0);
        assert!(tracker.is_step_completed("s1", 0));

        tracker.toggle_step("s1", 0);
        assert!(!tracker.is_step_completed("s1", 0));

        let s = scenario_with_steps("s1", &["a", "b"]);
        assert_eq!(tracker.completed_count(&s), before.completed_count(&s));
    }

    #[test]
    fn test_selection_is_toggle_and_exclusive() {
        let mut tracker = ProgressTracker::new();

        tracker.select_scenario("s1");
        assert_eq!(tracker.selected(), Some("s1"));

        // Selecting a different scenario replaces the expansion.
        tracker.select_scenario("s2");
        assert_eq!(tracker.selected(), Some("s2"));

        // Re-selecting collapses.
        tracker.select_scenario("s2");
        assert_eq!(tracker.selected(), None);
    }

    #[test]
    fn test_completion_percent_rounds() {
        let s = scenario_with_steps("s1", &["a", "b", "c"]);
        let mut tracker = ProgressTracker::new();

        tracker.toggle_step("s1", 0);
        assert_eq!(tracker.completion_percent(&s), 33);

        tracker.toggle_step("s1", 1);
        assert_eq!(tracker.completion_percent(&s), 67);

        tracker.toggle_step("s1", 2);
        assert_eq!(tracker.completion_percent(&s), 100);
    }

    #[test]
    fn test_out_of_range_indices_contribute_nothing() {
        let s = scenario_with_steps("s1", &["a", "b"]);
        let mut tracker = ProgressTracker::new();

        tracker.toggle_step("s1", 9);
        tracker.toggle_step("s1", 10);
        assert_eq!(tracker.completed_count(&s), 0);
        assert_eq!(tracker.completion_percent(&s), 0);
        assert!(!tracker.is_complete(&s));

        tracker.toggle_step("s1", 0);
        tracker.toggle_step("s1", 1);
        assert_eq!(tracker.completion_percent(&s), 100);
        assert!(tracker.is_complete(&s));
    }

    #[test]
    fn test_zero_step_scenario_is_never_complete() {
        let s = scenario_with_steps("s1", &[]);
        let mut tracker = ProgressTracker::new();

        tracker.toggle_step("s1", 0);
        assert_eq!(tracker.completion_percent(&s), 0);
        assert!(!tracker.is_complete(&s));
    }

    #[test]
    fn test_scenarios_track_independently() {
        let a = scenario_with_steps("a", &["x"]);
        let b = scenario_with_steps("b", &["x"]);
        let mut tracker = ProgressTracker::new();

        tracker.toggle_step("a", 0);
        assert!(tracker.is_complete(&a));
        assert!(!tracker.is_complete(&b));
    }
}
