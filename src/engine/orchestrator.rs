//! engine::orchestrator
//!
//! The two-phase build workflow over the selected refs.
//!
//! # Lifecycle
//!
//! ```text
//! Idle -> Filtering -> PreBuilding -> Building -> Finalizing -> Done
//! ```
//!
//! Linear, no cycles. Zero selected refs still flow through every phase
//! as no-ops over empty sequences, so finalization behavior is uniform.
//!
//! # Failure policy
//!
//! - Pre-build failure drops the ref and the run continues: that version
//!   is simply absent from the output.
//! - Build failure aborts the whole run: a version already promised to
//!   the navigation manifest is now missing, and a partially-linked
//!   output set is worse than no output.
//! - The working tree is restored to the home ref after every single
//!   build attempt, not just at the end, so even a mid-loop abort leaves
//!   the tree where the user had it.
//!
//! # Invariants
//!
//! - The active ref at every non-crash exit equals the home ref
//! - Builds are strictly sequential: the working tree is a single
//!   process-wide mutable resource, and two concurrent checkouts would
//!   corrupt each other's builds
//! - The final manifest contains exactly the refs whose build succeeded

use std::path::PathBuf;

use thiserror::Error;

use super::compiler::{CompilerFlags, DocCompiler, RenderContext};
use super::executor::{BuildExecutor, ExecuteError};
use super::filter::{self, FilterOutcome};
use super::manifest::NavigationManifest;
use crate::core::types::{BuildPhase, FilterSpec, RefHandle};
use crate::git::{CatalogError, RefCatalog, WorkingTreeCursor};

/// Default home ref name when none is configured and force mode is off.
const DEFAULT_MAIN_REF: &str = "main";

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    /// The catalog could not capture or restore the working tree.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A ref failed during the real build phase.
    #[error("build failed for '{refname}' during the build phase")]
    BuildFailed {
        /// The ref whose build failed.
        refname: String,
    },

    /// Environment fault during the real build phase.
    #[error("build error for '{refname}': {source}")]
    BuildErrored {
        /// The ref whose build errored.
        refname: String,
        /// The underlying executor error.
        #[source]
        source: ExecuteError,
    },

    /// The output root could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// The output root path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The top-level redirect page could not be written.
    #[error("failed to write {path}: {source}")]
    RedirectWrite {
        /// The redirect page path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Phase of the orchestration lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Filtering,
    PreBuilding,
    Building,
    Finalizing,
    Done,
}

/// What a completed run produced.
#[derive(Debug)]
pub struct BuildReport {
    /// Refs that survived pre-build, in build order.
    pub prebuilt: Vec<RefHandle>,
    /// Refs whose real build succeeded, in build order.
    pub built: Vec<RefHandle>,
    /// The final navigation manifest (exactly the successful builds).
    pub manifest: NavigationManifest,
    /// Refs dropped by a failed pre-build.
    pub dropped: Vec<RefHandle>,
    /// Select patterns that matched nothing (force off).
    pub unmatched_patterns: Vec<String>,
    /// Whether the top-level redirect page was written, and to where.
    pub redirect: Option<PathBuf>,
    /// The resolved main ref name.
    pub main_ref: String,
}

/// Per-run orchestration settings.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Directory holding the compiler configuration (conf dir).
    pub source_dir: PathBuf,
    /// Root of the versioned output tree.
    pub output_root: PathBuf,
    /// Select/exclude/force filtering.
    pub filter: FilterSpec,
    /// Run the disposable pre-build pass before real builds.
    pub prebuild: bool,
    /// Configured home label for the top-level redirect; resolved against
    /// the working tree when absent.
    pub main_ref: Option<String>,
    /// Static compiler toggles.
    pub flags: CompilerFlags,
}

/// Drives the two-phase workflow.
///
/// Owns the working tree for the duration of the run: all checkout /
/// build / restore sequences are serialized through [`Orchestrator::run`].
pub struct Orchestrator<'a> {
    catalog: &'a RefCatalog,
    compiler: &'a dyn DocCompiler,
    options: OrchestratorOptions,
    phase: Phase,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        catalog: &'a RefCatalog,
        compiler: &'a dyn DocCompiler,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            catalog,
            compiler,
            options,
            phase: Phase::Idle,
        }
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn advance(&mut self, phase: Phase) {
        tracing::debug!("phase: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Run the full workflow and return what was built.
    ///
    /// On success the working tree is back on the home ref. On a fatal
    /// build failure the tree is restored before the error propagates.
    pub fn run(&mut self) -> Result<BuildReport, OrchestrateError> {
        std::fs::create_dir_all(&self.options.output_root).map_err(|source| {
            OrchestrateError::OutputDir {
                path: self.options.output_root.clone(),
                source,
            }
        })?;

        let cursor = WorkingTreeCursor::capture(self.catalog)?;
        let executor = BuildExecutor::new(
            self.catalog,
            self.compiler,
            self.options.source_dir.clone(),
            self.options.output_root.clone(),
            self.options.flags,
        );

        // Filtering
        self.advance(Phase::Filtering);
        let FilterOutcome {
            selected,
            unmatched,
        } = filter::apply(&self.catalog.list_refs(), &self.options.filter);
        for pattern in &unmatched {
            tracing::error!(
                "no ref matches '{}'; use force mode to build it anyway",
                pattern
            );
        }
        tracing::info!(
            "selected versions: [{}]",
            selected
                .iter()
                .map(|r| r.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let main_ref = self.resolve_main_ref(&cursor);

        // PreBuilding
        self.advance(Phase::PreBuilding);
        let mut dropped = Vec::new();
        let to_build = if self.options.prebuild {
            let mut survivors = Vec::new();
            for handle in &selected {
                tracing::info!("pre-building '{}'", handle);
                let result = executor.execute(handle, BuildPhase::PreBuild, None);
                cursor.restore(self.catalog)?;
                match result {
                    Ok(outcome) if outcome.success => survivors.push(handle.clone()),
                    Ok(_) => {
                        tracing::warn!("pre-build failed for '{}'; dropping it", handle);
                        dropped.push(handle.clone());
                    }
                    Err(err) => {
                        tracing::warn!("pre-build error for '{}': {}; dropping it", handle, err);
                        dropped.push(handle.clone());
                    }
                }
            }
            survivors
        } else {
            tracing::info!("pre-build disabled; building all selected versions");
            selected.clone()
        };

        // Building
        self.advance(Phase::Building);
        // Optimistic manifest: every survivor is promised to every page
        // render; a survivor that then fails to build is fatal below.
        let promised = NavigationManifest::from_built(&to_build, self.catalog);
        let mut built = Vec::new();
        for handle in &to_build {
            tracing::info!("building '{}'", handle);
            let render = RenderContext {
                current_version: handle.name().to_string(),
                versions: promised.clone(),
            };
            let result = executor.execute(handle, BuildPhase::Build, Some(render));
            cursor.restore(self.catalog)?;
            match result {
                Ok(outcome) if outcome.success => built.push(handle.clone()),
                Ok(_) => {
                    tracing::error!("build failed for '{}' during the build phase", handle);
                    return Err(OrchestrateError::BuildFailed {
                        refname: handle.name().to_string(),
                    });
                }
                Err(source) => {
                    tracing::error!("build error for '{}': {}", handle, source);
                    return Err(OrchestrateError::BuildErrored {
                        refname: handle.name().to_string(),
                        source,
                    });
                }
            }
        }

        // Finalizing
        self.advance(Phase::Finalizing);
        let manifest = NavigationManifest::from_built(&built, self.catalog);
        let redirect = self.write_root_redirect(&built, &main_ref)?;

        self.advance(Phase::Done);
        Ok(BuildReport {
            prebuilt: to_build,
            built,
            manifest,
            dropped,
            unmatched_patterns: unmatched,
            redirect,
            main_ref,
        })
    }

    /// Resolve the home label for the top-level redirect.
    ///
    /// Configured value wins; otherwise the ref active at start when
    /// force mode is on (a forced detached build has no better anchor),
    /// else the fixed default.
    fn resolve_main_ref(&self, cursor: &WorkingTreeCursor) -> String {
        match &self.options.main_ref {
            Some(name) => name.clone(),
            None if self.options.filter.force => cursor.home().name().to_string(),
            None => DEFAULT_MAIN_REF.to_string(),
        }
    }

    /// Write `output_root/index.html` redirecting to the main ref's site.
    ///
    /// Skipped (non-fatal) when the main ref did not build: the rest of
    /// the output stays usable, just without a default landing page.
    fn write_root_redirect(
        &self,
        built: &[RefHandle],
        main_ref: &str,
    ) -> Result<Option<PathBuf>, OrchestrateError> {
        if !built.iter().any(|r| r.name() == main_ref) {
            tracing::error!(
                "main ref '{}' was not built; skipping the top-level index.html",
                main_ref
            );
            return Ok(None);
        }

        let path = self.options.output_root.join("index.html");
        let page = redirect_page(main_ref);
        std::fs::write(&path, page).map_err(|source| OrchestrateError::RedirectWrite {
            path: path.clone(),
            source,
        })?;
        tracing::info!("wrote top-level redirect to '{}'", main_ref);
        Ok(Some(path))
    }
}

/// The minimal meta-refresh page pointing at `{main}/index.html`.
fn redirect_page(main_ref: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta http-equiv=\"refresh\" content=\"0; url = {}/index.html\" />\n\
         </head>\n\
         </html>\n",
        main_ref
    )
}
