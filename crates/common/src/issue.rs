//! Issue deep-link building
//!
//! Converts a tester's free-text observation into a pre-filled issue-tracker
//! "new issue" URL. Pure string work: nothing here performs network I/O, and
//! navigation is entirely the caller's responsibility.

use serde::{Deserialize, Serialize};

/// Ephemeral note-modal state: which scenario (and optionally which step)
/// the observation is about. Never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDraft {
    pub scenario_id: String,
    pub scenario_title: String,
    pub role: String,
    #[serde(default)]
    pub step_index: Option<usize>,
    #[serde(default)]
    pub step_text: Option<String>,
    pub note_text: String,
}

/// Fixed issue-tracker target for generated deep links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTracker {
    pub host: String,
    pub org: String,
    pub repo: String,
    pub label: String,
}

impl Default for IssueTracker {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            org: "testdeck".to_string(),
            repo: "testdeck".to_string(),
            label: "user-testing".to_string(),
        }
    }
}

impl IssueTracker {
    /// Build a pre-filled "new issue" deep link, or `None` when the note is
    /// empty or whitespace-only. Callers should disable the action on `None`
    /// rather than ever showing a malformed link.
    pub fn build_issue_url(&self, draft: &IssueDraft) -> Option<String> {
        let note = draft.note_text.trim();
        if note.is_empty() {
            return None;
        }

        let step_label = match (draft.step_index, draft.step_text.as_deref()) {
            (Some(index), Some(text)) => Some(format!("Step {}: {}", index + 1, text)),
            _ => None,
        };

        let title = match &step_label {
            Some(label) => format!("[{}] {} — {}", draft.role, draft.scenario_title, label),
            None => format!("[{}] {}", draft.role, draft.scenario_title),
        };

        let mut body_lines: Vec<String> = vec![format!("Scenario: {}", draft.scenario_title)];
        if let Some(label) = &step_label {
            body_lines.push(format!("Step: {}", label));
        }
        body_lines.push(format!("Role: {}", draft.role));
        body_lines.push(String::new());
        body_lines.push("Observation:".to_string());
        body_lines.push(note.to_string());
        let body = body_lines.join("\n");

        Some(format!(
            "https://{}/{}/{}/issues/new?title={}&body={}&labels={}",
            self.host,
            self.org,
            self.repo,
            urlencoding::encode(&title),
            urlencoding::encode(&body),
            urlencoding::encode(&self.label),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(note: &str) -> IssueDraft {
        IssueDraft {
            scenario_id: "S1".to_string(),
            scenario_title: "Greet a customer".to_string(),
            role: "staff".to_string(),
            step_index: Some(1),
            step_text: Some("Offer help".to_string()),
            note_text: note.to_string(),
        }
    }

    #[test]
    fn test_empty_note_yields_no_url() {
        let tracker = IssueTracker::default();
        assert_eq!(tracker.build_issue_url(&draft("")), None);
        assert_eq!(tracker.build_issue_url(&draft("   ")), None);
    }

    #[test]
    fn test_url_contains_encoded_scenario_title() {
        let tracker = IssueTracker::default();
        let url = tracker.build_issue_url(&draft("Button missing")).unwrap();

        assert!(url.starts_with("https://github.com/testdeck/testdeck/issues/new?title="));
        assert!(url.ends_with("&labels=user-testing"));

        let title_param = url
            .split("title=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        let decoded = urlencoding::decode(title_param).unwrap();
        assert!(decoded.contains("Greet a customer"));
        assert!(decoded.contains("Step 2: Offer help"));
        assert!(decoded.starts_with("[staff]"));
    }

    #[test]
    fn test_body_line_order() {
        let tracker = IssueTracker::default();
        let url = tracker.build_issue_url(&draft("  Observed a glitch  ")).unwrap();

        let body_param = url
            .split("body=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        let body = urlencoding::decode(body_param).unwrap();
        let lines: Vec<&str> = body.split('\n').collect();

        assert_eq!(
            lines,
            vec![
                "Scenario: Greet a customer",
                "Step: Step 2: Offer help",
                "Role: staff",
                "",
                "Observation:",
                "Observed a glitch",
            ]
        );
    }

    #[test]
    fn test_scenario_level_note_skips_step_line() {
        let tracker = IssueTracker::default();
        let mut d = draft("Overall confusing");
        d.step_index = None;
        d.step_text = None;

        let url = tracker.build_issue_url(&d).unwrap();
        let body_param = url.split("body=").nth(1).unwrap().split('&').next().unwrap();
        let body = urlencoding::decode(body_param).unwrap();

        assert!(!body.contains("Step:"));
        let title_param = url.split("title=").nth(1).unwrap().split('&').next().unwrap();
        let title = urlencoding::decode(title_param).unwrap();
        assert_eq!(title, "[staff] Greet a customer");
    }
}
