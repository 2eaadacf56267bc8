//! Command implementations for gitnb-cli

pub mod convert;
pub mod diff;
pub mod init;
pub mod list;
pub mod track;
pub mod update;

pub use convert::{run_tonb, run_topy};
pub use diff::run_diff;
pub use init::{run_configure, run_gitignore, run_init};
pub use list::run_list;
pub use track::{run_add, run_remove};
pub use update::run_update;

use colored::Colorize;
use gitnb_core::{BatchReport, Error};
use gitnb_fs::NormalizedPath;

use crate::error::{CliError, Result};

/// Print per-file failures of a batch and turn them into the exit status.
pub(crate) fn finish_batch<T>(report: &BatchReport<T>) -> Result<()> {
    print_failures(&report.failed);
    if report.failed.is_empty() {
        return Ok(());
    }
    let total = report.failed.len() + report.succeeded.len();
    Err(CliError::user(format!(
        "{} of {} files failed",
        report.failed.len(),
        total
    )))
}

pub(crate) fn print_failures(failed: &[(NormalizedPath, Error)]) {
    for (path, error) in failed {
        eprintln!("{} {}: {}", "failed".red().bold(), path, error);
    }
}
