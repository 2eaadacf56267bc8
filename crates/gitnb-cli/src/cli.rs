//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gitnb - Track notebooks in git through plain-text mirrors
#[derive(Parser, Debug)]
#[command(name = "gitnb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize gitnb in the current directory
    ///
    /// Creates .gitnb/ with an empty ledger. Safe to run again.
    Init,

    /// Write a default .gitnb/config.toml
    Configure,

    /// Add the gitnb block to .gitignore
    Gitignore,

    /// List notebooks
    ///
    /// Kinds:
    ///   all        tracked and untracked notebooks (default)
    ///   tracked    notebooks in the ledger
    ///   untracked  notebooks found on disk but not tracked
    ///   nbpy       mirror scripts of tracked notebooks
    List {
        /// What to list
        #[arg(default_value = "all")]
        kind: String,
    },

    /// Track a notebook, or every notebook under a directory
    ///
    /// Examples:
    ///   gitnb add analysis.ipynb
    ///   gitnb add analysis.ipynb scripts/analysis.nbpy.py
    ///   gitnb add notebooks/
    Add {
        /// Notebook or directory
        path: PathBuf,

        /// Mirror destination (single notebook only)
        dest: Option<PathBuf>,
    },

    /// Stop tracking a notebook; files on disk are kept
    Remove {
        /// Notebook or directory
        path: PathBuf,
    },

    /// Regenerate mirrors of all tracked notebooks
    Update,

    /// Show how a notebook differs from its mirror
    Diff {
        /// Tracked notebook
        path: PathBuf,
    },

    /// Convert notebooks to scripts without tracking them
    Topy {
        /// Notebook or directory
        path: PathBuf,

        /// Script destination (single notebook only)
        dest: Option<PathBuf>,
    },

    /// Convert scripts back to notebooks
    Tonb {
        /// Script or directory
        path: PathBuf,

        /// Notebook destination (single script only)
        dest: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add_with_destination() {
        let cli = Cli::try_parse_from(["gitnb", "add", "a.ipynb", "out.nbpy.py"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Add {
                path: PathBuf::from("a.ipynb"),
                dest: Some(PathBuf::from("out.nbpy.py")),
            })
        );
    }

    #[test]
    fn parse_list_defaults_to_all() {
        let cli = Cli::try_parse_from(["gitnb", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List { kind: "all".into() }));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["gitnb", "update", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command, Some(Commands::Update));
    }

    #[test]
    fn remove_requires_path() {
        assert!(Cli::try_parse_from(["gitnb", "remove"]).is_err());
    }
}
