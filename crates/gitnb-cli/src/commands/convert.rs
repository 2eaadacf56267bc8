//! topy and tonb

use std::path::Path;

use colored::Colorize;
use gitnb_core::{BatchReport, Converted, Project, tonb, topy};

use super::finish_batch;
use crate::error::Result;

/// Run the topy command
pub fn run_topy(root: &Path, path: &Path, dest: Option<&Path>) -> Result<()> {
    let project = Project::open(root)?;
    report(&topy(&project, path, dest)?)
}

/// Run the tonb command
pub fn run_tonb(root: &Path, path: &Path, dest: Option<&Path>) -> Result<()> {
    let project = Project::open(root)?;
    report(&tonb(&project, path, dest)?)
}

fn report(report: &BatchReport<Converted>) -> Result<()> {
    for converted in &report.succeeded {
        println!(
            "{} {} -> {}",
            "Converted".green().bold(),
            converted.source,
            converted.destination.as_str().cyan()
        );
    }
    finish_batch(report)
}
