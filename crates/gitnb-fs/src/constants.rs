//! Well-known paths inside a gitnb project.

use std::path::Path;

/// Standard gitnb project paths, relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The `.gitnb` directory holding all tool state
    GitnbDir,
    /// The tracking ledger (`.gitnb/notebooks`)
    Ledger,
    /// The project configuration file (`.gitnb/config.toml`)
    Config,
    /// The project `.gitignore`
    GitIgnore,
}

impl ProjectPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitnbDir => ".gitnb",
            Self::Ledger => ".gitnb/notebooks",
            Self::Config => ".gitnb/config.toml",
            Self::GitIgnore => ".gitignore",
        }
    }
}

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
