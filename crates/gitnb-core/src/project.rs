//! A gitnb project: a root directory, its configuration and its ledger
//!
//! Every path accepted by [`Project`] may be absolute or relative to the
//! project root. Paths are stored and reported project-relative.

use std::collections::HashSet;
use std::path::{Component, Path};

use gitnb_content::DocumentCodec;
use gitnb_fs::{ConfigStore, NormalizedPath, PathIndex, ProjectPath, io};
use gitnb_git::{GitStager, Stager};

use crate::config::GitnbConfig;
use crate::ledger::{Ledger, TrackedEntry};
use crate::{Error, Result};

/// Result of tracking one notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub document: NormalizedPath,
    pub mirror: NormalizedPath,
    /// The mirror was staged in version control
    pub staged: bool,
    /// Why staging failed; the ledger entry is kept regardless
    pub stage_error: Option<String>,
}

/// Project root plus the configuration and collaborators that act on it.
pub struct Project {
    root: NormalizedPath,
    config: GitnbConfig,
    stager: Option<Box<dyn Stager>>,
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("stager", &self.stager.is_some())
            .finish()
    }
}

impl Project {
    /// Create a project over `root` with an explicit configuration and no
    /// stager.
    pub fn new(root: impl Into<NormalizedPath>, config: GitnbConfig) -> Self {
        Self {
            root: root.into(),
            config,
            stager: None,
        }
    }

    /// Open the project at `root`, loading `.gitnb/config.toml` (or
    /// `config.json`, `config.yaml`, `config.yml`) if present.
    ///
    /// When `git_add_on_add` is set, new mirrors are staged with a
    /// [`GitStager`].
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `root` does not exist; config parse errors
    /// are propagated.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let canonical = dunce::canonicalize(root).map_err(|e| gitnb_fs::Error::io(root, e))?;
        let root = NormalizedPath::new(canonical);

        let config: GitnbConfig = ConfigStore::new().load_or_default(&config_path_in(&root))?;

        let mut project = Self::new(root.clone(), config);
        if project.config.git_add_on_add {
            project.stager = Some(Box::new(GitStager::new(root)));
        }
        Ok(project)
    }

    /// Replace the staging collaborator.
    pub fn with_stager(mut self, stager: impl Stager + 'static) -> Self {
        self.stager = Some(Box::new(stager));
        self
    }

    /// Never stage anything.
    pub fn without_stager(mut self) -> Self {
        self.stager = None;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config(&self) -> &GitnbConfig {
        &self.config
    }

    /// Absolute location of a project-relative path.
    pub fn absolute(&self, relative: &NormalizedPath) -> NormalizedPath {
        if relative.is_current_dir() {
            return self.root.clone();
        }
        self.root.join(relative.as_str())
    }

    /// Express `path` relative to the project root.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] if the path escapes the project.
    pub fn relativize(&self, path: impl AsRef<Path>) -> Result<NormalizedPath> {
        let path = path.as_ref();

        let relative = if path.is_absolute() {
            let root = self.root.to_native();
            match path.strip_prefix(&root) {
                Ok(rest) => NormalizedPath::from(rest),
                Err(_) => {
                    // The path may reach the root through a symlink
                    let canonical = dunce::canonicalize(path).map_err(|_| {
                        Error::invalid_path(path, "outside of the project root")
                    })?;
                    let rest = canonical.strip_prefix(&root).map_err(|_| {
                        Error::invalid_path(path, "outside of the project root")
                    })?;
                    NormalizedPath::from(rest)
                }
            }
        } else {
            NormalizedPath::from(path)
        };

        // Fold `.` and `..` lexically; only a `..` past the root escapes
        let mut parts: Vec<String> = Vec::new();
        for component in relative.to_native().components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        return Err(Error::invalid_path(path, "must not leave the project root"));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(Error::invalid_path(path, "outside of the project root"));
                }
            }
        }
        Ok(NormalizedPath::new(parts.join("/")))
    }

    /// Reject a write target that would clobber its own source or the
    /// tool's state under `.gitnb/`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] naming the offending destination.
    pub fn check_destination(
        &self,
        source: &NormalizedPath,
        destination: &NormalizedPath,
    ) -> Result<()> {
        if destination == source {
            return Err(Error::invalid_path(
                destination.to_native(),
                "destination is the source file itself",
            ));
        }
        let state_dir = NormalizedPath::new(ProjectPath::GitnbDir.as_str());
        if destination.strip_prefix(&state_dir).is_some() {
            return Err(Error::invalid_path(
                destination.to_native(),
                "destination is inside .gitnb",
            ));
        }
        Ok(())
    }

    /// Create `.gitnb/` and an empty ledger.
    ///
    /// Idempotent: an existing ledger is never truncated. Returns `true`
    /// if the ledger was created.
    pub fn init(&self) -> Result<bool> {
        let ledger_path = self.ledger_path();
        if ledger_path.exists() {
            tracing::debug!(path = %ledger_path, "Ledger already present");
            return Ok(false);
        }
        Ledger::new().save(&ledger_path)?;
        tracing::info!(root = %self.root, "Initialized gitnb project");
        Ok(true)
    }

    /// Write the current configuration to `.gitnb/config.toml` unless a
    /// config file already exists. Returns `true` if one was written.
    pub fn configure(&self) -> Result<bool> {
        let path = self.config_path();
        if path.exists() {
            return Ok(false);
        }
        ConfigStore::new().save(&path, &self.config)?;
        tracing::info!(path = %path, "Wrote default configuration");
        Ok(true)
    }

    /// The config file in use, or `.gitnb/config.toml` when there is none
    pub fn config_path(&self) -> NormalizedPath {
        config_path_in(&self.root)
    }

    /// Get the path to the ledger file
    pub fn ledger_path(&self) -> NormalizedPath {
        self.root.join(ProjectPath::Ledger.as_str())
    }

    /// Load the ledger, or an empty one if the file doesn't exist
    pub fn load_ledger(&self) -> Result<Ledger> {
        match Ledger::load(&self.ledger_path(), &self.config.ledger_comment_prefix) {
            Err(Error::NotFound { .. }) => Ok(Ledger::new()),
            other => other,
        }
    }

    /// Save the ledger atomically
    pub fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        ledger.save(&self.ledger_path())
    }

    /// Mirror path `add` uses when none is given.
    pub fn default_mirror_path(&self, document: impl AsRef<Path>) -> Result<NormalizedPath> {
        let document = self.relativize(document)?;
        Ok(self.config.mirror_path_for(&document))
    }

    /// Track one notebook: write its mirror, record the entry and stage
    /// the mirror if configured.
    ///
    /// Adding an already tracked notebook replaces its entry. A previous
    /// mirror file at another location is left on disk.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if `document` (or `mirror`) is a directory,
    ///   if `mirror` is the notebook itself, lies under `.gitnb/` or already
    ///   mirrors another notebook, or if a path cannot be recorded in the
    ///   ledger
    /// - [`Error::NotFound`] if `document` does not exist
    /// - parse errors if `document` is not a valid notebook
    ///
    /// A staging failure is not an error; it is reported in the outcome.
    pub fn add(&self, document: impl AsRef<Path>, mirror: Option<&Path>) -> Result<AddOutcome> {
        let document = self.relativize(document)?;
        let document_abs = self.absolute(&document);

        if document_abs.is_dir() {
            return Err(Error::invalid_path(
                document.to_native(),
                "is a directory; add the notebooks inside it individually",
            ));
        }

        let mirror = match mirror {
            Some(mirror) => self.relativize(mirror)?,
            None => self.config.mirror_path_for(&document),
        };
        let mirror_abs = self.absolute(&mirror);
        if mirror_abs.is_dir() {
            return Err(Error::invalid_path(
                mirror.to_native(),
                "mirror destination is a directory",
            ));
        }
        self.check_destination(&document, &mirror)?;

        let entry = TrackedEntry::new(document.clone(), mirror.clone());
        entry.check_recordable(&self.config.ledger_comment_prefix)?;

        let mut ledger = self.load_ledger()?;
        if let Some(owner) = ledger.mirror_owner(&mirror).filter(|e| e.document != document) {
            return Err(Error::invalid_path(
                mirror.to_native(),
                format!("already the mirror of {}", owner.document),
            ));
        }
        if ledger.contains(&mirror) {
            return Err(Error::invalid_path(
                mirror.to_native(),
                "mirror destination is a tracked notebook",
            ));
        }

        let script = DocumentCodec::notebook_to_script(&document_abs)?;
        io::write_text(&mirror_abs, &script)?;

        let previous = ledger.upsert(entry);
        self.save_ledger(&ledger)?;
        tracing::info!(document = %document, mirror = %mirror, replaced = previous.is_some(), "Tracking notebook");

        let (staged, stage_error) = self.stage(&mirror);
        Ok(AddOutcome {
            document,
            mirror,
            staged,
            stage_error,
        })
    }

    fn stage(&self, mirror: &NormalizedPath) -> (bool, Option<String>) {
        if !self.config.git_add_on_add {
            return (false, None);
        }
        let Some(stager) = &self.stager else {
            return (false, None);
        };
        match stager.stage(mirror) {
            Ok(()) => (true, None),
            Err(e) => {
                tracing::warn!(path = %mirror, error = %e, "Failed to stage mirror");
                (false, Some(e.to_string()))
            }
        }
    }

    /// Stop tracking a notebook.
    ///
    /// Neither the notebook nor its mirror is deleted. Removing an
    /// untracked path is a no-op that leaves the ledger file untouched.
    /// Returns the removed entry.
    pub fn remove(&self, document: impl AsRef<Path>) -> Result<Option<TrackedEntry>> {
        let document = self.relativize(document)?;
        let mut ledger = self.load_ledger()?;

        let Some(entry) = ledger.remove(&document) else {
            tracing::debug!(document = %document, "Not tracked, nothing to remove");
            return Ok(None);
        };

        self.save_ledger(&ledger)?;
        tracing::info!(document = %document, "Stopped tracking notebook");
        Ok(Some(entry))
    }

    /// Tracked notebooks in ledger order
    pub fn list_tracked(&self) -> Result<Vec<NormalizedPath>> {
        Ok(self.load_ledger()?.documents())
    }

    /// Mirrors of tracked notebooks in ledger order
    pub fn list_mirrors(&self) -> Result<Vec<NormalizedPath>> {
        Ok(self.load_ledger()?.mirrors())
    }

    /// Notebooks found under the root that are not tracked, in discovery
    /// order.
    pub fn list_untracked(&self) -> Result<Vec<NormalizedPath>> {
        let ledger = self.load_ledger()?;
        let tracked: HashSet<&NormalizedPath> =
            ledger.entries().iter().map(|e| &e.document).collect();

        Ok(self
            .discover_notebooks(&NormalizedPath::new("."))?
            .into_iter()
            .filter(|doc| !tracked.contains(doc))
            .collect())
    }

    /// Mirror recorded for a notebook, if tracked
    pub fn resolve_mirror(&self, document: impl AsRef<Path>) -> Result<Option<NormalizedPath>> {
        let document = self.relativize(document)?;
        Ok(self.load_ledger()?.get(&document).map(|e| e.mirror.clone()))
    }

    /// Notebooks under a project-relative directory, project-relative.
    pub fn discover_notebooks(&self, dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
        self.discover(dir, &self.config.notebook_glob)
    }

    /// Files under a project-relative directory whose names match
    /// `pattern`, honouring the configured exclusions.
    pub fn discover(&self, dir: &NormalizedPath, pattern: &str) -> Result<Vec<NormalizedPath>> {
        let found = PathIndex::new(self.absolute(dir), pattern)?
            .exclude_dirs(self.config.exclude_dirs.iter().cloned())
            .discover()?;
        Ok(found.into_iter().map(|p| dir.join(p.as_str())).collect())
    }
}

fn config_path_in(root: &NormalizedPath) -> NormalizedPath {
    ConfigStore::new()
        .find(&root.join(ProjectPath::GitnbDir.as_str()), "config")
        .unwrap_or_else(|| root.join(ProjectPath::Config.as_str()))
}
