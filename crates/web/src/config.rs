//! Web server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use testdeck_common::issue::IssueTracker;

/// Harness web server configuration, loaded from `TESTDECK_*` environment
/// variables with sensible defaults for local use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Listen host
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Path to the scenario markdown document
    pub scenarios_path: PathBuf,

    /// Optional static directory for a frontend dist
    pub static_dir: Option<PathBuf>,

    /// URL of the application under test, rendered as an opaque frame
    pub app_url: String,

    /// Optional SQLite database for testing notes; in-memory when unset
    pub notes_db: Option<PathBuf>,

    /// Issue tracker target for deep links
    pub issue_tracker: IssueTracker,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8077,
            scenarios_path: PathBuf::from(testdeck_common::DEFAULT_SCENARIO_DOC),
            static_dir: None,
            app_url: "https://testdeck.github.io/demo-app/".to_string(),
            notes_db: None,
            issue_tracker: IssueTracker::default(),
        }
    }
}

impl WebConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env_string("TESTDECK_WEB_HOST").unwrap_or(defaults.host);
        let port = env_string("TESTDECK_WEB_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);
        let scenarios_path = env_string("TESTDECK_SCENARIOS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.scenarios_path);
        let static_dir = env_string("TESTDECK_STATIC_DIR").map(PathBuf::from);
        let app_url = env_string("TESTDECK_APP_URL").unwrap_or(defaults.app_url);
        let notes_db = env_string("TESTDECK_NOTES_DB").map(PathBuf::from);

        let mut issue_tracker = defaults.issue_tracker;
        if let Some(org) = env_string("TESTDECK_ISSUE_ORG") {
            issue_tracker.org = org;
        }
        if let Some(repo) = env_string("TESTDECK_ISSUE_REPO") {
            issue_tracker.repo = repo;
        }
        if let Some(label) = env_string("TESTDECK_ISSUE_LABEL") {
            issue_tracker.label = label;
        }

        Self {
            host,
            port,
            scenarios_path,
            static_dir,
            app_url,
            notes_db,
            issue_tracker,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let v = v.trim().to_string();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    })
}
