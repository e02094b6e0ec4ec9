//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Verdocs - build every branch and tag of a documentation tree into one
/// versioned static site
#[derive(Parser, Debug)]
#[command(name = "verdocs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if verdocs was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the selected versions into the output tree
    #[command(
        name = "build",
        long_about = "Build the selected versions into the output tree.\n\n\
            Every tag and branch of the repository (optionally narrowed by \
            --select/--exclude glob patterns) is checked out, compiled with \
            sphinx-build into a scratch directory, and copied into a \
            version-named subdirectory of the output root. Versions that fail \
            the disposable pre-build pass are dropped; a failure during the \
            real build aborts the run. A top-level index.html redirecting to \
            the main ref is written last.",
        after_help = "\
EXAMPLES:
    # Build all tags and branches with docs/conf.py into docs/_build
    verdocs build

    # Only release tags and main, skipping the withdrawn release
    verdocs build -s 'v*' -s main --exclude v0.9.0

    # Build a commit that has no ref, and land the redirect on it
    verdocs build -s 3f2a9c1 --force -m 3f2a9c1"
    )]
    Build {
        /// Path to conf.py (or its directory) for the document compiler
        #[arg(long, value_name = "PATH")]
        local_conf: Option<PathBuf>,

        /// Output directory for the versioned site
        #[arg(short = 'O', long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Path to a directory inside the local repository
        #[arg(long, value_name = "PATH")]
        git_root: Option<PathBuf>,

        /// Build only refs matching this glob (repeatable; order matters)
        #[arg(short, long = "select", value_name = "PATTERN")]
        select: Vec<String>,

        /// Drop refs matching this glob after selection (repeatable)
        #[arg(long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Build select patterns that match no ref as literal names
        #[arg(long)]
        force: bool,

        /// Run the disposable pre-build pass (default)
        #[arg(long, conflicts_with = "no_prebuild")]
        prebuild: bool,

        /// Skip the pre-build pass and build all selected refs directly
        #[arg(long)]
        no_prebuild: bool,

        /// The ref the top-level index.html redirects to
        #[arg(short, long = "main-ref", value_name = "REF")]
        main_ref: Option<String>,

        /// Show compiler output (suppressed by default)
        #[arg(long)]
        no_quiet: bool,

        /// Pass -vv to the compiler
        #[arg(short, long)]
        verbose: bool,

        /// Compiler command to invoke (default: sphinx-build)
        #[arg(long, value_name = "CMD")]
        sphinx_command: Option<String>,
    },

    /// List the tags and branches the repository offers for building
    #[command(name = "versions")]
    Versions {
        /// Path to a directory inside the local repository
        #[arg(long, value_name = "PATH")]
        git_root: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
