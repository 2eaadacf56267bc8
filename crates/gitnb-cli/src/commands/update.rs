//! The update command

use std::path::Path;

use colored::Colorize;
use gitnb_core::{Project, SyncEngine};

use crate::error::{CliError, Result};

/// Run the update command
pub fn run_update(root: &Path) -> Result<()> {
    let project = Project::open(root)?;
    let report = SyncEngine::new(&project).update_all()?;

    for mirror in &report.changed {
        println!("{} {}", "Updated".green().bold(), mirror);
    }
    if report.changed.is_empty() && report.is_success() {
        println!("{} All mirrors up to date", "OK".green().bold());
    }

    for error in &report.errors {
        eprintln!("{} {}", "failed".red().bold(), error);
    }
    if !report.is_success() {
        return Err(CliError::user(format!(
            "{} notebooks could not be updated",
            report.errors.len()
        )));
    }
    Ok(())
}
