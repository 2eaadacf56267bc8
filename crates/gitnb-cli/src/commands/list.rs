//! The list command

use std::path::Path;

use colored::Colorize;
use gitnb_core::Project;
use gitnb_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Run the list command
pub fn run_list(root: &Path, kind: &str) -> Result<()> {
    let project = Project::open(root)?;

    match kind {
        "all" => {
            print_section("Tracked", &project.list_tracked()?);
            println!();
            print_section("Untracked", &project.list_untracked()?);
        }
        "tracked" => print_plain(&project.list_tracked()?),
        "untracked" => print_plain(&project.list_untracked()?),
        "nbpy" => print_plain(&project.list_mirrors()?),
        other => {
            return Err(CliError::user(format!(
                "Unknown list kind '{}'. Valid: all, tracked, untracked, nbpy",
                other
            )));
        }
    }
    Ok(())
}

fn print_section(label: &str, paths: &[NormalizedPath]) {
    println!("{} ({}):", label.bold(), paths.len());
    for path in paths {
        println!("  {}", path.as_str().green());
    }
}

// One path per line, for scripting
fn print_plain(paths: &[NormalizedPath]) {
    for path in paths {
        println!("{}", path);
    }
}
