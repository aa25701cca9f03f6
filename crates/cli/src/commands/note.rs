//! Local testing-note commands

use clap::Subcommand;
use std::path::PathBuf;

use testdeck_common::db::SqliteNoteStore;
use testdeck_common::notes::{NoteStore, TestingNote};

use crate::output::{self, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Record a testing note
    Add {
        /// Scenario id the note is about
        #[arg(long)]
        scenario: String,

        /// Tester role
        #[arg(long)]
        role: String,

        /// Free-text observation
        #[arg(long)]
        note: String,

        /// 0-based step index, when the note concerns one step
        #[arg(long)]
        step_index: Option<usize>,

        /// Note database path
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List recorded testing notes
    List {
        /// Note database path
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn open_store(db: Option<PathBuf>) -> anyhow::Result<SqliteNoteStore> {
    let path = db.unwrap_or_else(testdeck_common::default_notes_db_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(SqliteNoteStore::open(&path)?)
}

impl TableDisplay for TestingNote {
    fn headers() -> Vec<&'static str> {
        vec!["SCENARIO", "STEP", "ROLE", "NOTE", "RECORDED"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.scenario_id.clone(),
            self.step_index
                .map(|i| (i + 1).to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.role.clone(),
            self.note.clone(),
            chrono::DateTime::from_timestamp(self.created_at, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| self.created_at.to_string()),
        ]
    }
}

pub async fn execute(cmd: NoteCommands, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        NoteCommands::Add {
            scenario,
            role,
            note,
            step_index,
            db,
        } => {
            let store = open_store(db)?;
            let mut testing_note = TestingNote::new(scenario, role, note);
            testing_note.step_index = step_index;

            let ack = store.submit_note(&testing_note).await?;
            output::print_success(&format!("Recorded note {}", ack.note_id));
            Ok(())
        }
        NoteCommands::List { db } => {
            let store = open_store(db)?;
            let notes = store.list_notes().await?;
            output::print_list(&notes, format);
            Ok(())
        }
    }
}
