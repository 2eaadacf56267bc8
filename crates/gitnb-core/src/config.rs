//! Project configuration
//!
//! A [`GitnbConfig`] is an explicit value handed to [`crate::Project`];
//! nothing reads configuration from global state. It is persisted at
//! `.gitnb/config.toml` and every field falls back to its default when
//! absent, so a partial file is valid.

use gitnb_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// File extension of notebooks.
pub const NOTEBOOK_EXTENSION: &str = ".ipynb";

/// Options consulted by the ledger, discovery and conversion code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitnbConfig {
    /// Directory-path substrings skipped during discovery
    pub exclude_dirs: Vec<String>,
    /// File-name glob identifying notebooks
    pub notebook_glob: String,
    /// Directory mirrors are written under; empty means next to the notebook
    pub mirror_dir: String,
    /// Appended to the notebook stem to form the mirror file name
    pub mirror_suffix: String,
    /// Directory `tonb` writes notebooks under by default
    pub notebook_dir: String,
    /// Stage new mirrors in git after `add`
    pub git_add_on_add: bool,
    /// Ledger lines starting with this are comments
    pub ledger_comment_prefix: String,
}

impl Default for GitnbConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: vec![
                ".ipynb_checkpoints".to_string(),
                ".gitnb".to_string(),
                "nbpy_nb".to_string(),
            ],
            notebook_glob: "*.ipynb".to_string(),
            mirror_dir: "nbpy".to_string(),
            mirror_suffix: ".nbpy.py".to_string(),
            notebook_dir: "nbpy_nb".to_string(),
            git_add_on_add: true,
            ledger_comment_prefix: "#".to_string(),
        }
    }
}

impl GitnbConfig {
    /// Glob matching mirror scripts, derived from the suffix.
    pub fn mirror_glob(&self) -> String {
        format!("*{}", self.mirror_suffix)
    }

    /// Default mirror for a project-relative notebook path.
    ///
    /// `notebooks/a.ipynb` becomes `nbpy/notebooks/a.nbpy.py`.
    pub fn mirror_path_for(&self, document: &NormalizedPath) -> NormalizedPath {
        let stem = document
            .strip_suffix(NOTEBOOK_EXTENSION)
            .unwrap_or_else(|| document.clone());
        under(&self.mirror_dir, &stem).with_suffix(&self.mirror_suffix)
    }

    /// Default notebook for a project-relative script path.
    ///
    /// The inverse of [`GitnbConfig::mirror_path_for`], except that the
    /// result lands under `notebook_dir` so it never overwrites a source
    /// notebook: `nbpy/notebooks/a.nbpy.py` becomes
    /// `nbpy_nb/notebooks/a.ipynb`.
    pub fn notebook_path_for(&self, script: &NormalizedPath) -> NormalizedPath {
        let relative = if self.mirror_dir.is_empty() {
            script.clone()
        } else {
            script
                .strip_prefix(&NormalizedPath::new(&self.mirror_dir))
                .unwrap_or_else(|| script.clone())
        };
        let stem = relative
            .strip_suffix(&self.mirror_suffix)
            .or_else(|| relative.strip_suffix(".py"))
            .unwrap_or(relative);
        under(&self.notebook_dir, &stem).with_suffix(NOTEBOOK_EXTENSION)
    }
}

fn under(dir: &str, path: &NormalizedPath) -> NormalizedPath {
    if dir.is_empty() {
        path.clone()
    } else {
        NormalizedPath::new(dir).join(path.as_str())
    }
}
