//! engine::executor
//!
//! One isolated build transaction for a single ref.
//!
//! # Transaction shape
//!
//! 1. Check out the ref (the working tree now holds that version's
//!    sources).
//! 2. Acquire a fresh scratch directory, exclusively owned by this
//!    invocation and removed on every exit path (RAII).
//! 3. Invoke the external compiler with the configured source dir, the
//!    scratch dir as target, and the static flags.
//! 4. Non-zero compiler exit is a per-ref condition reported in the
//!    outcome, never an error from here; the orchestrator decides
//!    whether it is fatal.
//! 5. Pre-build success: outcome recorded, scratch discarded.
//! 6. Build success: scratch contents copied into `output_root/{name}`,
//!    merging into and overwriting any existing contents (never wiping
//!    first), so re-runs are idempotent per ref.
//!
//! The executor never restores the working tree: it has no notion of the
//! home ref across sequential calls. Restoration belongs to the
//! orchestrator's loop.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use super::compiler::{CompileRequest, CompilerError, CompilerFlags, DocCompiler, RenderContext};
use crate::core::types::{BuildOutcome, BuildPhase, RefHandle};
use crate::git::{CatalogError, RefCatalog};

/// Errors from build execution.
///
/// These are environment faults (checkout, scratch space, output copy,
/// compiler spawn). A compiler that runs and exits non-zero is a
/// `success=false` outcome, not an error.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The ref could not be checked out.
    #[error(transparent)]
    Checkout(#[from] CatalogError),

    /// The compiler invocation itself failed.
    #[error(transparent)]
    Compiler(#[from] CompilerError),

    /// Scratch directory or output copy failed.
    #[error("i/o error during {action}: {source}")]
    Io {
        /// What was being done.
        action: String,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Runs one isolated build transaction per call.
///
/// Holds the per-run constants: which catalog performs checkouts, which
/// compiler renders, where sources live, and where output materializes.
pub struct BuildExecutor<'a> {
    catalog: &'a RefCatalog,
    compiler: &'a dyn DocCompiler,
    source_dir: PathBuf,
    output_root: PathBuf,
    flags: CompilerFlags,
}

impl<'a> BuildExecutor<'a> {
    /// Create an executor over the given collaborators.
    ///
    /// `source_dir` is the directory holding the compiler configuration
    /// (the conf dir); `output_root` is where per-version sites land.
    pub fn new(
        catalog: &'a RefCatalog,
        compiler: &'a dyn DocCompiler,
        source_dir: PathBuf,
        output_root: PathBuf,
        flags: CompilerFlags,
    ) -> Self {
        Self {
            catalog,
            compiler,
            source_dir,
            output_root,
            flags,
        }
    }

    /// Execute one build transaction.
    ///
    /// `render` carries the explicit render-phase inputs and is absent
    /// for pre-builds. On return the working tree still reflects
    /// `handle`; the caller restores it.
    pub fn execute(
        &self,
        handle: &RefHandle,
        phase: BuildPhase,
        render: Option<RenderContext>,
    ) -> Result<BuildOutcome, ExecuteError> {
        self.catalog.checkout(handle.name())?;

        let scratch = tempfile::Builder::new()
            .prefix("verdocs-")
            .tempdir()
            .map_err(|source| ExecuteError::Io {
                action: "creating scratch directory".to_string(),
                source,
            })?;
        tracing::debug!(
            "building '{}' ({}) in {}",
            handle,
            phase,
            scratch.path().display()
        );

        let request = CompileRequest {
            source_dir: self.source_dir.clone(),
            target_dir: scratch.path().to_path_buf(),
            flags: self.flags,
            render,
        };
        let status = self.compiler.compile(&request)?;

        if !status.is_success() {
            return Ok(BuildOutcome {
                handle: handle.clone(),
                phase,
                success: false,
            });
        }

        if phase == BuildPhase::Build {
            let destination = self.output_root.join(handle.name());
            copy_tree(scratch.path(), &destination)?;
            tracing::debug!(
                "materialized '{}' into {}",
                handle,
                destination.display()
            );
        }

        Ok(BuildOutcome {
            handle: handle.clone(),
            phase,
            success: true,
        })
    }
}

/// Copy `from`'s contents into `to`, creating directories as needed and
/// overwriting existing files. Existing files not present in `from` are
/// left alone: the copy is additive, not a clean replace.
fn copy_tree(from: &Path, to: &Path) -> Result<(), ExecuteError> {
    let io_err = |action: String| move |source: std::io::Error| ExecuteError::Io { action, source };

    std::fs::create_dir_all(to)
        .map_err(io_err(format!("creating {}", to.display())))?;

    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| ExecuteError::Io {
            action: format!("walking {}", from.display()),
            source: e.into(),
        })?;
        let relative = match entry.path().strip_prefix(from) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let destination = to.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)
                .map_err(io_err(format!("creating {}", destination.display())))?;
        } else {
            std::fs::copy(entry.path(), &destination)
                .map_err(io_err(format!("copying to {}", destination.display())))?;
        }
    }
    Ok(())
}
