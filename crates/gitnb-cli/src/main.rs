//! gitnb CLI
//!
//! Tracks Jupyter notebooks in git through plain-text `nbpy` mirrors.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} Notebook tracking for git", "gitnb".green().bold());
            println!();
            println!("Run {} for available commands.", "gitnb --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Init => commands::run_init(&cwd),
        Commands::Configure => commands::run_configure(&cwd),
        Commands::Gitignore => commands::run_gitignore(&cwd),
        Commands::List { kind } => commands::run_list(&cwd, &kind),
        Commands::Add { path, dest } => commands::run_add(&cwd, &path, dest.as_deref()),
        Commands::Remove { path } => commands::run_remove(&cwd, &path),
        Commands::Update => commands::run_update(&cwd),
        Commands::Diff { path } => commands::run_diff(&cwd, &path),
        Commands::Topy { path, dest } => commands::run_topy(&cwd, &path, dest.as_deref()),
        Commands::Tonb { path, dest } => commands::run_tonb(&cwd, &path, dest.as_deref()),
    }
}
