//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls into the engine/git layers to do the work
//! 3. Formats and displays output
//!
//! Handlers do not drive checkouts or builds directly; that belongs to
//! the orchestrator.

mod build;
mod completion;
mod versions;

pub use build::{build, BuildArgs};
pub use completion::completion;
pub use versions::versions;

use super::args::Command;
use super::Context;
use anyhow::Result;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Build {
            local_conf,
            output,
            git_root,
            select,
            exclude,
            force,
            prebuild,
            no_prebuild,
            main_ref,
            no_quiet,
            verbose,
            sphinx_command,
        } => build(
            ctx,
            BuildArgs {
                local_conf,
                output,
                git_root,
                select,
                exclude,
                force,
                prebuild,
                no_prebuild,
                main_ref,
                no_quiet,
                verbose,
                sphinx_command,
            },
        ),
        Command::Versions { git_root } => versions(ctx, git_root),
        Command::Completion { shell } => completion(shell),
    }
}
