//! Staging files into the git index

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use git2::{ErrorCode, Repository};
use gitnb_fs::NormalizedPath;

use crate::{Error, Result};

/// Something that can stage a file for the next commit.
pub trait Stager {
    /// Stage `path`, given relative to the project root.
    fn stage(&self, path: &NormalizedPath) -> Result<()>;
}

impl<S: Stager + ?Sized> Stager for Arc<S> {
    fn stage(&self, path: &NormalizedPath) -> Result<()> {
        (**self).stage(path)
    }
}

/// Stages files into the index of the git repository enclosing a
/// project root.
///
/// The repository is discovered on every call, so a project may live in
/// a subdirectory of the work tree.
#[derive(Debug, Clone)]
pub struct GitStager {
    root: NormalizedPath,
}

impl GitStager {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    fn open(&self) -> Result<Repository> {
        Repository::discover(self.root.to_native()).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::NotARepository {
                path: self.root.to_native(),
            },
            _ => Error::Git(e),
        })
    }
}

/// Express `absolute` relative to the repository work tree.
fn relative_to_workdir(workdir: &Path, absolute: &Path) -> Result<PathBuf> {
    let workdir = dunce::canonicalize(workdir).map_err(|e| gitnb_fs::Error::io(workdir, e))?;
    let absolute = dunce::canonicalize(absolute).map_err(|e| gitnb_fs::Error::io(absolute, e))?;
    match absolute.strip_prefix(&workdir) {
        Ok(relative) => Ok(relative.to_path_buf()),
        Err(_) => Err(Error::OutsideWorkTree { path: absolute }),
    }
}

impl Stager for GitStager {
    fn stage(&self, path: &NormalizedPath) -> Result<()> {
        let repo = self.open()?;
        let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: repo.path().to_path_buf(),
        })?;

        let absolute = self.root.join(path.as_str()).to_native();
        let relative = relative_to_workdir(workdir, &absolute)?;

        let mut index = repo.index()?;
        index.add_path(&relative)?;
        index.write()?;

        tracing::debug!(path = %path, "Staged file");
        Ok(())
    }
}

/// Records staged paths without touching git.
#[derive(Debug, Default)]
pub struct RecordingStager {
    staged: Mutex<Vec<NormalizedPath>>,
}

impl RecordingStager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths staged so far, in call order.
    pub fn staged(&self) -> Vec<NormalizedPath> {
        self.staged
            .lock()
            .map(|staged| staged.clone())
            .unwrap_or_default()
    }
}

impl Stager for RecordingStager {
    fn stage(&self, path: &NormalizedPath) -> Result<()> {
        if let Ok(mut staged) = self.staged.lock() {
            staged.push(path.clone());
        }
        Ok(())
    }
}
