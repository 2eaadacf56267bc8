//! add and remove

use std::path::Path;

use colored::Colorize;
use gitnb_core::{Project, add_path, remove_path};

use super::finish_batch;
use crate::error::Result;

/// Run the add command
pub fn run_add(root: &Path, path: &Path, dest: Option<&Path>) -> Result<()> {
    let project = Project::open(root)?;
    let report = add_path(&project, path, dest)?;

    for outcome in &report.succeeded {
        println!(
            "{} {} -> {}",
            "Tracking".green().bold(),
            outcome.document,
            outcome.mirror.as_str().cyan()
        );
        if let Some(error) = &outcome.stage_error {
            eprintln!(
                "{} could not stage {}: {}",
                "warning:".yellow().bold(),
                outcome.mirror,
                error
            );
        }
    }
    finish_batch(&report)
}

/// Run the remove command
pub fn run_remove(root: &Path, path: &Path) -> Result<()> {
    let project = Project::open(root)?;
    let report = remove_path(&project, path)?;

    for (document, removed) in &report.succeeded {
        match removed {
            Some(entry) => println!(
                "{} {} (mirror {} kept)",
                "Untracked".green().bold(),
                entry.document,
                entry.mirror
            ),
            None => eprintln!("{} {} is not tracked", "warning:".yellow().bold(), document),
        }
    }
    finish_batch(&report)
}
