//! Diff command implementation
//!
//! Shows how a tracked notebook differs from its last-synced mirror.

use std::path::Path;

use colored::Colorize;
use gitnb_core::{Project, diff_against_mirror};

use crate::error::Result;

/// Run the diff command
pub fn run_diff(root: &Path, path: &Path) -> Result<()> {
    let project = Project::open(root)?;
    let result = diff_against_mirror(&project, path)?;

    if result.is_clean() {
        println!(
            "{} {} matches {}",
            "OK".green().bold(),
            result.document,
            result.mirror
        );
        return Ok(());
    }

    print_unified(&result.diff.unified);
    println!();
    println!(
        "{} {} insertions(+), {} deletions(-)",
        "Summary:".bold(),
        result.diff.insertions(),
        result.diff.deletions()
    );
    Ok(())
}

/// Print unified diff text, coloured by line type
fn print_unified(unified: &str) {
    for line in unified.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
