//! Scenario data model and role filtering

use serde::{Deserialize, Serialize};

/// One parsed QA workflow unit.
///
/// Records are created once per parse and immutable thereafter. `id` is
/// always non-empty: the parser synthesizes `scenario-<n>` when a heading
/// carries neither an explicit id nor a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,

    /// Lowercase audience tag derived from the nearest preceding `##`
    /// heading; `None` for scenarios that appear before any role heading.
    pub role_key: Option<String>,

    pub title: String,

    /// Single-space join of the contiguous lines in the Context block.
    #[serde(default)]
    pub context: String,

    /// Ordered workflow steps, ordinals stripped.
    #[serde(default)]
    pub steps: Vec<String>,

    /// Ordered success criteria (dash bullets and ordered items alike).
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

impl Scenario {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role_key: None,
            title: title.into(),
            context: String::new(),
            steps: Vec::new(),
            success_criteria: Vec::new(),
        }
    }
}

/// Narrow a scenario list to one audience.
///
/// Scenarios whose role key equals `lowercase(role)` are kept. When that
/// selection comes up empty (unknown role, role-less document), the entire
/// unfiltered list is returned instead: navigating to an unrecognized role
/// must never produce a blank harness.
pub fn filter_by_role(scenarios: &[Scenario], role: &str) -> Vec<Scenario> {
    let role = role.to_lowercase();
    let filtered: Vec<Scenario> = scenarios
        .iter()
        .filter(|s| s.role_key.as_deref().unwrap_or("") == role)
        .cloned()
        .collect();

    if filtered.is_empty() {
        scenarios.to_vec()
    } else {
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(id: &str, role: Option<&str>) -> Scenario {
        Scenario {
            role_key: role.map(str::to_string),
            ..Scenario::new(id, id)
        }
    }

    #[test]
    fn test_filter_matches_role_case_insensitively() {
        let all = vec![
            scenario("s1", Some("staff")),
            scenario("s2", Some("customer")),
            scenario("s3", Some("staff")),
        ];

        let staff = filter_by_role(&all, "Staff");
        assert_eq!(staff.len(), 2);
        assert!(staff.iter().all(|s| s.role_key.as_deref() == Some("staff")));
    }

    #[test]
    fn test_unknown_role_falls_back_to_full_list() {
        let all = vec![
            scenario("s1", Some("staff")),
            scenario("s2", Some("customer")),
        ];

        let out = filter_by_role(&all, "nonexistent-role");
        assert_eq!(out, all);
    }

    #[test]
    fn test_roleless_scenarios_never_blank_the_harness() {
        let all = vec![scenario("s1", None), scenario("s2", None)];
        let out = filter_by_role(&all, "admin");
        assert_eq!(out.len(), 2);
    }
}
