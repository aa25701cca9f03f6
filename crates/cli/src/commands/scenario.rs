//! Scenario document commands

use anyhow::{bail, Context};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use testdeck_common::{filter_by_role, parse_scenarios, Scenario};

use crate::output::{self, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ScenarioCommands {
    /// List scenarios in a document
    List {
        /// Path to the scenario markdown document
        #[arg(long, default_value = testdeck_common::DEFAULT_SCENARIO_DOC)]
        file: PathBuf,

        /// Only show scenarios for this role (unknown roles show everything)
        #[arg(long)]
        role: Option<String>,
    },

    /// Show one scenario in full
    Show {
        /// Scenario id
        id: String,

        /// Path to the scenario markdown document
        #[arg(long, default_value = testdeck_common::DEFAULT_SCENARIO_DOC)]
        file: PathBuf,
    },

    /// Check a document for structural problems
    Check {
        /// Path to the scenario markdown document
        #[arg(long, default_value = testdeck_common::DEFAULT_SCENARIO_DOC)]
        file: PathBuf,
    },
}

pub fn execute(cmd: ScenarioCommands, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ScenarioCommands::List { file, role } => list(&file, role.as_deref(), format),
        ScenarioCommands::Show { id, file } => show(&file, &id, format),
        ScenarioCommands::Check { file } => check(&file),
    }
}

fn load(file: &Path) -> anyhow::Result<Vec<Scenario>> {
    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read scenario document: {}", file.display()))?;
    Ok(parse_scenarios(&markdown))
}

impl TableDisplay for Scenario {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "ROLE", "TITLE", "STEPS", "CRITERIA"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.role_key.clone().unwrap_or_else(|| "-".to_string()),
            self.title.clone(),
            self.steps.len().to_string(),
            self.success_criteria.len().to_string(),
        ]
    }
}

fn list(file: &Path, role: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let scenarios = load(file)?;
    let scenarios = match role {
        Some(role) => filter_by_role(&scenarios, role),
        None => scenarios,
    };
    output::print_list(&scenarios, format);
    Ok(())
}

fn show(file: &Path, id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let scenarios = load(file)?;
    let scenario = scenarios
        .iter()
        .find(|s| s.id == id)
        .with_context(|| format!("Scenario not found: {}", id))?;

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(scenario)?);
        return Ok(());
    }

    println!("{} — {}", scenario.id, scenario.title);
    if let Some(role) = &scenario.role_key {
        println!("Role: {}", role);
    }
    if !scenario.context.is_empty() {
        println!("\nContext:\n  {}", scenario.context);
    }
    if !scenario.steps.is_empty() {
        println!("\nWorkflow steps:");
        for (i, step) in scenario.steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
    if !scenario.success_criteria.is_empty() {
        println!("\nSuccess state:");
        for criterion in &scenario.success_criteria {
            println!("  - {}", criterion);
        }
    }
    Ok(())
}

fn check(file: &Path) -> anyhow::Result<()> {
    let scenarios = load(file)?;
    if scenarios.is_empty() {
        bail!("No scenarios found in {}", file.display());
    }

    let mut warnings = 0;
    for s in &scenarios {
        if s.role_key.is_none() {
            output::print_warning(&format!("{}: no role heading applies", s.id));
            warnings += 1;
        }
        if s.steps.is_empty() {
            output::print_warning(&format!("{}: no workflow steps", s.id));
            warnings += 1;
        }
        if s.success_criteria.is_empty() {
            output::print_warning(&format!("{}: no success criteria", s.id));
            warnings += 1;
        }
        if s.context.is_empty() {
            output::print_warning(&format!("{}: no context", s.id));
            warnings += 1;
        }
    }

    output::print_success(&format!(
        "{} scenario(s) parsed from {} ({} warning(s))",
        scenarios.len(),
        file.display(),
        warnings
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_parses_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "## Staff Scenarios\n### S1: Greet\n**Workflow Steps**:\n1. Hello"
        )
        .unwrap();

        let scenarios = load(file.path()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].id, "S1");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = load(Path::new("/nonexistent/scenarios.md")).unwrap_err();
        assert!(err.to_string().contains("Cannot read scenario document"));
    }
}
