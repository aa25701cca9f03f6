//! Issue deep-link command

use anyhow::bail;
use clap::Args;

use testdeck_common::issue::{IssueDraft, IssueTracker};

#[derive(Args)]
pub struct IssueArgs {
    /// Scenario id the observation is about
    #[arg(long)]
    pub scenario_id: String,

    /// Scenario title used in the issue title and body
    #[arg(long)]
    pub scenario_title: String,

    /// Tester role
    #[arg(long)]
    pub role: String,

    /// 0-based step index, when the note concerns one step
    #[arg(long, requires = "step_text")]
    pub step_index: Option<usize>,

    /// Step text matching --step-index
    #[arg(long, requires = "step_index")]
    pub step_text: Option<String>,

    /// Free-text observation
    #[arg(long)]
    pub note: String,

    /// Issue tracker organization
    #[arg(long)]
    pub org: Option<String>,

    /// Issue tracker repository
    #[arg(long)]
    pub repo: Option<String>,

    /// Issue label
    #[arg(long)]
    pub label: Option<String>,
}

pub fn execute(args: IssueArgs) -> anyhow::Result<()> {
    let mut tracker = IssueTracker::default();
    if let Some(org) = args.org {
        tracker.org = org;
    }
    if let Some(repo) = args.repo {
        tracker.repo = repo;
    }
    if let Some(label) = args.label {
        tracker.label = label;
    }

    let draft = IssueDraft {
        scenario_id: args.scenario_id,
        scenario_title: args.scenario_title,
        role: args.role,
        step_index: args.step_index,
        step_text: args.step_text,
        note_text: args.note,
    };

    match tracker.build_issue_url(&draft) {
        Some(url) => {
            println!("{}", url);
            Ok(())
        }
        None => bail!("Note text is empty; nothing to report"),
    }
}
