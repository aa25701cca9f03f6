//! Harness sessions: per-tester completion state and viewport control

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use testdeck_common::progress::ProgressTracker;
use testdeck_common::scenario::Scenario;

/// Device viewport emulated for the embedded application frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl DeviceKind {
    /// Frame width in CSS pixels.
    pub fn frame_width(&self) -> u32 {
        match self {
            DeviceKind::Desktop => 1200,
            DeviceKind::Tablet => 768,
            DeviceKind::Mobile => 375,
        }
    }
}

/// One tester's in-memory harness state.
///
/// Completion state and the frame reload counter have independent
/// lifecycles: reloading the embedded application never clears progress.
/// Nothing here survives the server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSession {
    pub id: Uuid,
    pub role: String,
    pub tracker: ProgressTracker,
    pub device: DeviceKind,
    pub reload_count: u64,
    pub created_at: i64,
}

impl HarnessSession {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into().to_lowercase(),
            tracker: ProgressTracker::new(),
            device: DeviceKind::default(),
            reload_count: 0,
            created_at: Utc::now().timestamp(),
        }
    }

    /// Bump the frame reload counter ("reset environment").
    pub fn reload_frame(&mut self) {
        self.reload_count += 1;
    }

    /// Progress snapshot for one live scenario.
    pub fn progress_for(&self, scenario: &Scenario) -> ScenarioProgress {
        ScenarioProgress {
            scenario_id: scenario.id.clone(),
            completed_count: self.tracker.completed_count(scenario),
            total_steps: scenario.steps.len(),
            percent: self.tracker.completion_percent(scenario),
            complete: self.tracker.is_complete(scenario),
            selected: self.tracker.selected() == Some(scenario.id.as_str()),
        }
    }
}

/// Per-scenario progress as reported by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioProgress {
    pub scenario_id: String,
    pub completed_count: usize,
    pub total_steps: usize,
    pub percent: u8,
    pub complete: bool,
    pub selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(id: &str, steps: usize) -> Scenario {
        let mut s = Scenario::new(id, id);
        s.steps = (0..steps).map(|i| format!("step {i}")).collect();
        s
    }

    #[test]
    fn test_reload_does_not_touch_progress() {
        let mut session = HarnessSession::new("Staff");
        let s = scenario("s1", 2);

        session.tracker.toggle_step("s1", 0);
        session.reload_frame();
        session.reload_frame();

        assert_eq!(session.reload_count, 2);
        assert_eq!(session.progress_for(&s).completed_count, 1);
    }

    #[test]
    fn test_role_is_normalized_lowercase() {
        let session = HarnessSession::new("STAFF");
        assert_eq!(session.role, "staff");
    }

    #[test]
    fn test_device_frame_widths() {
        assert_eq!(DeviceKind::Desktop.frame_width(), 1200);
        assert_eq!(DeviceKind::Tablet.frame_width(), 768);
        assert_eq!(DeviceKind::Mobile.frame_width(), 375);
    }

    #[test]
    fn test_progress_snapshot_reflects_selection() {
        let mut session = HarnessSession::new("staff");
        let s = scenario("s1", 1);

        session.tracker.select_scenario("s1");
        assert!(session.progress_for(&s).selected);

        session.tracker.select_scenario("s1");
        assert!(!session.progress_for(&s).selected);
    }
}
