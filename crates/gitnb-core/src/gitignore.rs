//! Managed block in the project's `.gitignore`

use gitnb_fs::{NormalizedPath, ProjectPath, io};

use crate::project::Project;
use crate::{Error, Result};

/// First line of the managed block; its presence means the block exists.
pub const MANAGED_MARKER: &str = "# AUTO-GENERATED BY GITNB";

/// What [`apply`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreOutcome {
    Created,
    Appended,
    AlreadyPresent,
}

/// Patterns in the managed block.
///
/// Notebooks themselves are ignored; their mirrors are what gets
/// committed.
pub fn managed_patterns(project: &Project) -> Vec<String> {
    let mut patterns = vec![
        ".ipynb_checkpoints/".to_string(),
        "*.ipynb".to_string(),
        format!("{}/", ProjectPath::GitnbDir.as_str()),
    ];
    let notebook_dir = project.config().notebook_dir.trim_end_matches('/');
    if !notebook_dir.is_empty() {
        patterns.push(format!("{}/", notebook_dir));
    }
    patterns
}

/// Append the managed block to `.gitignore`, creating the file if needed.
pub fn apply(project: &Project) -> Result<GitignoreOutcome> {
    let path: NormalizedPath = project.root().join(ProjectPath::GitIgnore.as_str());

    let existing = match io::read_text(&path) {
        Ok(content) => Some(content),
        Err(gitnb_fs::Error::NotFound { .. }) => None,
        Err(e) => return Err(Error::from(e)),
    };

    if let Some(content) = &existing
        && content.lines().any(|line| line.trim() == MANAGED_MARKER)
    {
        return Ok(GitignoreOutcome::AlreadyPresent);
    }

    let mut content = existing.clone().unwrap_or_default();
    if !content.is_empty() {
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push('\n');
    }
    content.push_str(MANAGED_MARKER);
    content.push('\n');
    for pattern in managed_patterns(project) {
        content.push_str(&pattern);
        content.push('\n');
    }

    io::write_text(&path, &content)?;
    tracing::info!(path = %path, "Wrote gitignore block");

    Ok(match existing {
        Some(_) => GitignoreOutcome::Appended,
        None => GitignoreOutcome::Created,
    })
}
