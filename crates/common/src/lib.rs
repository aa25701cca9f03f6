//! Testdeck Common Library
//!
//! Shared types and logic for the Testdeck scenario harness: the markdown
//! scenario parser, role filtering, step-completion tracking, issue deep-link
//! building, and the testing-note persistence seam.

pub mod db;
pub mod error;
pub mod issue;
pub mod notes;
pub mod parser;
pub mod progress;
pub mod scenario;

// Re-export commonly used types
pub use error::{Error, Result};
pub use issue::{IssueDraft, IssueTracker};
pub use notes::{MemoryNoteStore, NoteAck, NoteStore, TestingNote};
pub use parser::parse_scenarios;
pub use progress::ProgressTracker;
pub use scenario::{filter_by_role, Scenario};

/// Testdeck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default scenario document filename, relative to the working directory.
pub const DEFAULT_SCENARIO_DOC: &str = "assets/user-testing-scenarios.md";

/// Default store path
pub fn default_store_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".testdeck")
}

/// Default local notes database path
pub fn default_notes_db_path() -> std::path::PathBuf {
    default_store_path().join("notes.db")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
