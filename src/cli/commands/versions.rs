//! versions command - List the refs the repository offers for building

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::git::RefCatalog;
use crate::ui::output::{self, Verbosity};

/// Print the catalog snapshot: every tag, then every branch.
pub fn versions(ctx: &Context, git_root: Option<PathBuf>) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    if let Some(dir) = &ctx.cwd {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let root = git_root.unwrap_or_else(|| PathBuf::from("."));
    let catalog = RefCatalog::open(&root)?;

    for handle in catalog.list_refs() {
        output::print(format!("{}\t{}", handle.kind(), handle), verbosity);
    }

    Ok(())
}
