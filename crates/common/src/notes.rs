//! Testing-note persistence seam
//!
//! The harness records free-text observations through one narrow interface
//! so its logic never depends on a specific storage technology. The sqlite
//! adapter lives in [`crate::db`]; the in-memory adapter here backs tests
//! and the default server configuration.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};

/// One recorded observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestingNote {
    pub scenario_id: String,
    #[serde(default)]
    pub step_index: Option<usize>,
    pub role: String,
    pub note: String,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl TestingNote {
    pub fn new(scenario_id: impl Into<String>, role: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            step_index: None,
            role: role.into(),
            note: note.into(),
            page_url: None,
            user_agent: None,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// Acknowledgement returned by a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAck {
    pub note_id: String,
    pub created_at: i64,
}

/// Storage seam for testing notes.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Persist a note. Empty or whitespace-only notes are rejected with
    /// [`Error::EmptyNote`] before any storage is touched.
    async fn submit_note(&self, note: &TestingNote) -> Result<NoteAck>;

    /// All recorded notes, oldest first.
    async fn list_notes(&self) -> Result<Vec<TestingNote>>;
}

/// Trim the note text, rejecting empty submissions.
pub(crate) fn validated_note(note: &TestingNote) -> Result<TestingNote> {
    let text = note.note.trim();
    if text.is_empty() {
        return Err(Error::EmptyNote);
    }
    let mut validated = note.clone();
    validated.note = text.to_string();
    if validated.created_at == 0 {
        validated.created_at = Utc::now().timestamp();
    }
    Ok(validated)
}

/// In-memory note store.
#[derive(Default, Clone)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<Vec<TestingNote>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn submit_note(&self, note: &TestingNote) -> Result<NoteAck> {
        let validated = validated_note(note)?;
        let ack = NoteAck {
            note_id: Uuid::new_v4().to_string(),
            created_at: validated.created_at,
        };
        self.notes.write().await.push(validated);
        Ok(ack)
    }

    async fn list_notes(&self) -> Result<Vec<TestingNote>> {
        Ok(self.notes.read().await.clone())
    }
}
