//! Shared handling of path arguments that may name a file or a directory
//!
//! Every batch-capable operation resolves its argument through
//! [`resolve_inputs`] and processes the resulting files one at a time in
//! discovery order. A failing file never stops the rest; failures are
//! collected into the [`BatchReport`].

use std::path::Path;

use gitnb_fs::NormalizedPath;

use crate::project::{AddOutcome, Project};
use crate::ledger::TrackedEntry;
use crate::{Error, Result};

/// Concrete files a path argument stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// Project-relative files, in discovery order
    pub files: Vec<NormalizedPath>,
    /// The argument named a directory
    pub from_directory: bool,
}

impl ResolvedInputs {
    fn single(file: NormalizedPath) -> Self {
        Self {
            files: vec![file],
            from_directory: false,
        }
    }
}

/// Resolve `path` to the files an operation should visit.
///
/// A file resolves to itself. A directory resolves to the files beneath
/// it whose names match `pattern`, honouring the configured exclusions.
///
/// # Errors
///
/// [`Error::NotFound`] if `path` does not exist.
pub fn resolve_inputs(
    project: &Project,
    path: impl AsRef<Path>,
    pattern: &str,
) -> Result<ResolvedInputs> {
    let relative = project.relativize(path)?;
    let absolute = project.absolute(&relative);

    if absolute.is_dir() {
        let files = project.discover(&relative, pattern)?;
        tracing::debug!(dir = %relative, files = files.len(), "Expanded directory");
        return Ok(ResolvedInputs {
            files,
            from_directory: true,
        });
    }
    if !absolute.exists() {
        return Err(Error::NotFound {
            path: relative.to_native(),
        });
    }
    Ok(ResolvedInputs::single(relative))
}

/// Outcome of applying an operation to several files
#[derive(Debug)]
pub struct BatchReport<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<(NormalizedPath, Error)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Apply `op` to each file in order, collecting results and failures.
    pub fn run<F>(files: &[NormalizedPath], mut op: F) -> Self
    where
        F: FnMut(&NormalizedPath) -> Result<T>,
    {
        let mut report = Self::default();
        for file in files {
            match op(file) {
                Ok(value) => report.succeeded.push(value),
                Err(e) => {
                    tracing::warn!(path = %file, error = %e, "Skipping file");
                    report.failed.push((file.clone(), e));
                }
            }
        }
        report
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Destination to use for each resolved file.
///
/// A destination only makes sense for a single file; for a directory it
/// is dropped with a warning.
pub(crate) fn single_destination<'a>(
    inputs: &ResolvedInputs,
    destination: Option<&'a Path>,
) -> Option<&'a Path> {
    match destination {
        Some(dest) if inputs.from_directory => {
            tracing::warn!(destination = %dest.display(), "Ignoring destination for a directory argument");
            None
        }
        other => other,
    }
}

/// Track a notebook, or every notebook under a directory.
pub fn add_path(
    project: &Project,
    path: impl AsRef<Path>,
    destination: Option<&Path>,
) -> Result<BatchReport<AddOutcome>> {
    let inputs = resolve_inputs(project, path, &project.config().notebook_glob)?;
    let destination = single_destination(&inputs, destination);
    Ok(BatchReport::run(&inputs.files, |doc| {
        project.add(doc, destination)
    }))
}

/// Stop tracking a notebook, or every notebook under a directory.
///
/// A path that no longer exists on disk is still looked up in the ledger,
/// so a deleted notebook can be untracked. Each result is the removed
/// entry, or `None` for a path that was not tracked.
pub fn remove_path(
    project: &Project,
    path: impl AsRef<Path>,
) -> Result<BatchReport<(NormalizedPath, Option<TrackedEntry>)>> {
    let path = path.as_ref();
    let inputs = match resolve_inputs(project, path, &project.config().notebook_glob) {
        Err(Error::NotFound { .. }) => ResolvedInputs::single(project.relativize(path)?),
        other => other?,
    };
    Ok(BatchReport::run(&inputs.files, |doc| {
        Ok((doc.clone(), project.remove(doc)?))
    }))
}
