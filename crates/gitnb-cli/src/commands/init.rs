//! Project setup commands

use std::path::Path;

use colored::Colorize;
use gitnb_core::{GitignoreOutcome, Project, gitignore};

use crate::error::Result;

/// Run the init command
pub fn run_init(root: &Path) -> Result<()> {
    let project = Project::open(root)?;
    if project.init()? {
        println!(
            "{} Initialized gitnb in {}",
            "OK".green().bold(),
            project.root().as_str().cyan()
        );
    } else {
        println!("{} Already initialized", "OK".green().bold());
    }
    Ok(())
}

/// Run the configure command
pub fn run_configure(root: &Path) -> Result<()> {
    let project = Project::open(root)?;
    let path = project.config_path();
    if project.configure()? {
        println!("{} Wrote {}", "OK".green().bold(), path.as_str().cyan());
    } else {
        println!(
            "{} {} already exists, leaving it alone",
            "OK".green().bold(),
            path.as_str().cyan()
        );
    }
    Ok(())
}

/// Run the gitignore command
pub fn run_gitignore(root: &Path) -> Result<()> {
    let project = Project::open(root)?;
    match gitignore::apply(&project)? {
        GitignoreOutcome::Created => println!("{} Created .gitignore", "OK".green().bold()),
        GitignoreOutcome::Appended => {
            println!("{} Added gitnb block to .gitignore", "OK".green().bold())
        }
        GitignoreOutcome::AlreadyPresent => println!(
            "{} gitnb block already present in .gitignore",
            "OK".green().bold()
        ),
    }
    Ok(())
}
