//! SQLite-backed note store

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::notes::{validated_note, NoteAck, NoteStore, TestingNote};

/// [`NoteStore`] adapter persisting notes to a local SQLite database.
#[derive(Clone)]
pub struct SqliteNoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoteStore {
    /// Open or create the database at path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;

        // WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;

        info!("Opened note store at {:?}", path.as_ref());
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS testing_notes (
                id TEXT PRIMARY KEY,
                scenario_id TEXT NOT NULL,
                step_index INTEGER,
                role TEXT NOT NULL,
                note TEXT NOT NULL,
                page_url TEXT,
                user_agent TEXT,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_testing_notes_scenario ON testing_notes(scenario_id);
            CREATE INDEX IF NOT EXISTS idx_testing_notes_created ON testing_notes(created_at);
            "#,
        )?;
        Ok(())
    }
}

#[async_trait]
impl NoteStore for SqliteNoteStore {
    async fn submit_note(&self, note: &TestingNote) -> Result<NoteAck> {
        let validated = validated_note(note)?;
        let note_id = Uuid::new_v4().to_string();

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO testing_notes
                (id, scenario_id, step_index, role, note, page_url, user_agent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                note_id,
                validated.scenario_id,
                validated.step_index.map(|i| i as i64),
                validated.role,
                validated.note,
                validated.page_url,
                validated.user_agent,
                validated.created_at,
            ],
        )?;

        Ok(NoteAck {
            note_id,
            created_at: validated.created_at,
        })
    }

    async fn list_notes(&self) -> Result<Vec<TestingNote>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT scenario_id, step_index, role, note, page_url, user_agent, created_at
             FROM testing_notes ORDER BY created_at ASC, id ASC",
        )?;

        let notes = stmt
            .query_map([], |row| {
                Ok(TestingNote {
                    scenario_id: row.get(0)?,
                    step_index: row.get::<_, Option<i64>>(1)?.map(|i| i as usize),
                    role: row.get(2)?,
                    note: row.get(3)?,
                    page_url: row.get(4)?,
                    user_agent: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }
}
