//! One-off conversions that do not touch the ledger

use std::path::Path;

use gitnb_content::DocumentCodec;
use gitnb_fs::{NormalizedPath, io};

use crate::Result;
use crate::batch::{BatchReport, resolve_inputs, single_destination};
use crate::project::Project;

/// A file converted by [`topy`] or [`tonb`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub source: NormalizedPath,
    pub destination: NormalizedPath,
}

/// Convert a notebook, or every notebook under a directory, to a script.
///
/// Without a destination each script goes where `add` would put the
/// mirror.
pub fn topy(
    project: &Project,
    path: impl AsRef<Path>,
    destination: Option<&Path>,
) -> Result<BatchReport<Converted>> {
    let inputs = resolve_inputs(project, path, &project.config().notebook_glob)?;
    let destination = single_destination(&inputs, destination);

    Ok(BatchReport::run(&inputs.files, |notebook| {
        let target = match destination {
            Some(dest) => project.relativize(dest)?,
            None => project.config().mirror_path_for(notebook),
        };
        project.check_destination(notebook, &target)?;
        let script = DocumentCodec::notebook_to_script(&project.absolute(notebook))?;
        io::write_text(&project.absolute(&target), &script)?;
        tracing::info!(source = %notebook, destination = %target, "Converted notebook to script");
        Ok(Converted {
            source: notebook.clone(),
            destination: target,
        })
    }))
}

/// Convert a script, or every script under a directory, to a notebook.
///
/// Without a destination each notebook lands under `notebook_dir`, so a
/// source notebook is never overwritten by accident.
pub fn tonb(
    project: &Project,
    path: impl AsRef<Path>,
    destination: Option<&Path>,
) -> Result<BatchReport<Converted>> {
    let inputs = resolve_inputs(project, path, &project.config().mirror_glob())?;
    let destination = single_destination(&inputs, destination);

    Ok(BatchReport::run(&inputs.files, |script| {
        let target = match destination {
            Some(dest) => project.relativize(dest)?,
            None => project.config().notebook_path_for(script),
        };
        project.check_destination(script, &target)?;
        let notebook = DocumentCodec::script_to_notebook(&project.absolute(script))?;
        notebook.write(&project.absolute(&target))?;
        tracing::info!(source = %script, destination = %target, "Converted script to notebook");
        Ok(Converted {
            source: script.clone(),
            destination: target,
        })
    }))
}
