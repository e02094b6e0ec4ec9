//! engine::compiler
//!
//! The boundary to the external document compiler.
//!
//! # Design
//!
//! The compiler is a black box: `compile(source, target, flags)` renders a
//! source tree into a static HTML tree and reports an exit status. Verdocs
//! only decides *what* to compile and *where*; everything about rendering
//! belongs to the external tool.
//!
//! The "current version" and the navigation manifest are not ambient
//! state. They travel inside [`RenderContext`], threaded explicitly
//! through every [`CompileRequest`]; the subprocess adapter serializes the
//! context into an environment variable for the compiler's page hooks to
//! read. Two invocations in one run share nothing.
//!
//! # Implementations
//!
//! - [`SphinxCompiler`] spawns an external `sphinx-build`-compatible
//!   command.
//! - [`MockCompiler`] is a deterministic in-memory implementation for
//!   tests: it records every request and can be scripted to fail.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::manifest::NavigationManifest;
use crate::core::types::BuildPhase;

/// Environment variable carrying the serialized [`RenderContext`] into
/// the compiler subprocess.
pub const RENDER_CONTEXT_ENV: &str = "VERDOCS_RENDER_CONTEXT";

/// Default compiler command.
pub const DEFAULT_COMMAND: &str = "sphinx-build";

/// Errors from compiler invocation.
///
/// A compiler that runs and exits non-zero is NOT an error here; that is
/// a [`CompileStatus::Failed`]. Errors mean the invocation itself could
/// not happen.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The compiler executable could not be spawned.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        /// The command that was attempted.
        command: String,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// The render context could not be serialized.
    #[error("failed to encode render context: {0}")]
    ContextEncoding(#[from] serde_json::Error),
}

/// Exit status of one compile invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    /// The compiler exited zero.
    Succeeded,
    /// The compiler ran and exited non-zero.
    Failed,
}

impl CompileStatus {
    /// Whether the compile succeeded.
    pub fn is_success(self) -> bool {
        matches!(self, CompileStatus::Succeeded)
    }
}

/// Static per-run compiler toggles. Not per-ref.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompilerFlags {
    /// Suppress compiler output (`-Q`).
    pub quiet: bool,
    /// Extra-verbose compiler output (`-vv`).
    pub verbose: bool,
}

impl CompilerFlags {
    /// The extra argv entries these flags map to.
    pub fn to_args(self) -> Vec<&'static str> {
        let mut args = Vec::new();
        if self.quiet {
            args.push("-Q");
        }
        if self.verbose {
            args.push("-vv");
        }
        args
    }
}

/// Explicit render-phase inputs for one compile invocation.
///
/// Carries the values the compiler's page hooks read while rendering:
/// which version is being built and which versions to cross-link. Passed
/// per invocation instead of living in any process-wide registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderContext {
    /// Name of the version currently being rendered.
    pub current_version: String,
    /// Every version the navigation widget should link to.
    pub versions: NavigationManifest,
}

/// One compile invocation.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// Directory containing the documentation sources (conf dir).
    pub source_dir: PathBuf,
    /// Directory the compiler renders into.
    pub target_dir: PathBuf,
    /// Static quiet/verbose toggles.
    pub flags: CompilerFlags,
    /// Render inputs; absent for disposable pre-builds.
    pub render: Option<RenderContext>,
}

/// The document compiler collaborator.
///
/// Must support repeated invocation within one process without state
/// leaking between invocations; everything an invocation needs is in its
/// [`CompileRequest`].
pub trait DocCompiler {
    /// Render `source_dir` into `target_dir`.
    fn compile(&self, request: &CompileRequest) -> Result<CompileStatus, CompilerError>;
}

/// Compiler backed by an external `sphinx-build`-compatible command.
///
/// Invoked as `<command> <source> <target> [flags...]`, synchronous and
/// blocking. The render context rides in the [`RENDER_CONTEXT_ENV`]
/// environment variable as JSON.
#[derive(Debug, Clone)]
pub struct SphinxCompiler {
    command: String,
}

impl SphinxCompiler {
    /// Compiler using the default `sphinx-build` command.
    pub fn new() -> Self {
        Self::with_command(DEFAULT_COMMAND)
    }

    /// Compiler using a custom command (configuration override; also what
    /// keeps end-to-end tests hermetic).
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The configured command.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for SphinxCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DocCompiler for SphinxCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileStatus, CompilerError> {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&request.source_dir)
            .arg(&request.target_dir)
            .args(request.flags.to_args());

        if let Some(render) = &request.render {
            let payload = serde_json::to_string(render)?;
            cmd.env(RENDER_CONTEXT_ENV, payload);
        }

        tracing::debug!(
            "invoking {} {} -> {}",
            self.command,
            request.source_dir.display(),
            request.target_dir.display()
        );

        let status = cmd.status().map_err(|source| CompilerError::SpawnFailed {
            command: self.command.clone(),
            source,
        })?;

        if status.success() {
            Ok(CompileStatus::Succeeded)
        } else {
            tracing::debug!("compiler exited with {}", status);
            Ok(CompileStatus::Failed)
        }
    }
}

/// Recorded invocation, for test verification.
#[derive(Debug, Clone)]
pub struct MockInvocation {
    /// The version name from the render context, if one was attached.
    pub current_version: Option<String>,
    /// The source directory the compiler was pointed at.
    pub source_dir: PathBuf,
    /// The flags the invocation carried.
    pub flags: CompilerFlags,
    /// Whether a render context (real build) was attached.
    pub had_render_context: bool,
}

/// Deterministic scripted compiler for tests.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share
/// state. Each successful compile writes an `index.html` marker (plus a
/// `_static/` asset) into the target directory so materialization can be
/// observed. Failures are scripted per version name.
#[derive(Debug, Clone, Default)]
pub struct MockCompiler {
    inner: Arc<Mutex<MockCompilerInner>>,
}

#[derive(Debug, Default)]
struct MockCompilerInner {
    /// Version names that fail when compiled without a render context
    /// (the pre-build shape).
    fail_prebuild: Vec<String>,
    /// Version names that fail when compiled with a render context
    /// (the build shape).
    fail_build: Vec<String>,
    /// Recorded invocations, in order.
    invocations: Vec<MockInvocation>,
}

impl MockCompiler {
    /// A compiler that succeeds for everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a failure for `name` during the given phase.
    pub fn fail_on(&self, name: &str, phase: BuildPhase) {
        let mut inner = self.inner.lock().unwrap();
        match phase {
            BuildPhase::PreBuild => inner.fail_prebuild.push(name.to_string()),
            BuildPhase::Build => inner.fail_build.push(name.to_string()),
        }
    }

    /// All recorded invocations, in order.
    pub fn invocations(&self) -> Vec<MockInvocation> {
        self.inner.lock().unwrap().invocations.clone()
    }

    /// How many times the compiler ran.
    pub fn invocation_count(&self) -> usize {
        self.inner.lock().unwrap().invocations.len()
    }

    fn write_site(target: &Path, version: &str) {
        std::fs::create_dir_all(target.join("_static")).expect("mock: create target");
        std::fs::write(
            target.join("index.html"),
            format!("<html><body>{}</body></html>\n", version),
        )
        .expect("mock: write index");
        std::fs::write(target.join("_static").join("site.css"), "body {}\n")
            .expect("mock: write asset");
    }
}

impl DocCompiler for MockCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<CompileStatus, CompilerError> {
        let mut inner = self.inner.lock().unwrap();

        let current = request
            .render
            .as_ref()
            .map(|r| r.current_version.clone());
        inner.invocations.push(MockInvocation {
            current_version: current.clone(),
            source_dir: request.source_dir.clone(),
            flags: request.flags,
            had_render_context: request.render.is_some(),
        });

        // The scripted name comes from the render context when present;
        // pre-builds are matched by reading the marker the test fixture
        // leaves in the source tree.
        let version = match &current {
            Some(name) => name.clone(),
            None => std::fs::read_to_string(request.source_dir.join(".version"))
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        };

        let scripted_failure = match request.render {
            Some(_) => inner.fail_build.iter().any(|n| *n == version),
            None => inner.fail_prebuild.iter().any(|n| *n == version),
        };
        if scripted_failure {
            return Ok(CompileStatus::Failed);
        }

        Self::write_site(&request.target_dir, &version);
        Ok(CompileStatus::Succeeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RefHandle;

    mod flags {
        use super::*;

        #[test]
        fn quiet_maps_to_dash_q() {
            let flags = CompilerFlags {
                quiet: true,
                verbose: false,
            };
            assert_eq!(flags.to_args(), vec!["-Q"]);
        }

        #[test]
        fn verbose_maps_to_dash_vv() {
            let flags = CompilerFlags {
                quiet: false,
                verbose: true,
            };
            assert_eq!(flags.to_args(), vec!["-vv"]);
        }

        #[test]
        fn default_adds_nothing() {
            assert!(CompilerFlags::default().to_args().is_empty());
        }
    }

    mod render_context {
        use super::*;

        #[test]
        fn round_trips_through_json() {
            let manifest = NavigationManifest::from_handles(&[
                RefHandle::tag("v1.0").unwrap(),
                RefHandle::branch("main").unwrap(),
            ]);
            let ctx = RenderContext {
                current_version: "main".to_string(),
                versions: manifest.clone(),
            };
            let json = serde_json::to_string(&ctx).unwrap();
            let back: RenderContext = serde_json::from_str(&json).unwrap();
            assert_eq!(back.current_version, "main");
            assert_eq!(back.versions, manifest);
        }
    }

    mod mock {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn records_invocations_and_writes_site() {
            let compiler = MockCompiler::new();
            let source = TempDir::new().unwrap();
            let target = TempDir::new().unwrap();
            std::fs::write(source.path().join(".version"), "v1.0").unwrap();

            let request = CompileRequest {
                source_dir: source.path().to_path_buf(),
                target_dir: target.path().to_path_buf(),
                flags: CompilerFlags::default(),
                render: None,
            };
            let status = compiler.compile(&request).unwrap();

            assert!(status.is_success());
            assert_eq!(compiler.invocation_count(), 1);
            assert!(!compiler.invocations()[0].had_render_context);
            assert!(target.path().join("index.html").exists());
            assert!(target.path().join("_static/site.css").exists());
        }

        #[test]
        fn scripted_failure_by_phase() {
            let compiler = MockCompiler::new();
            compiler.fail_on("v1.0", BuildPhase::Build);

            let source = TempDir::new().unwrap();
            let target = TempDir::new().unwrap();
            std::fs::write(source.path().join(".version"), "v1.0").unwrap();

            // Pre-build (no render context) still succeeds.
            let prebuild = CompileRequest {
                source_dir: source.path().to_path_buf(),
                target_dir: target.path().to_path_buf(),
                flags: CompilerFlags::default(),
                render: None,
            };
            assert!(compiler.compile(&prebuild).unwrap().is_success());

            // The build-shaped request fails.
            let build = CompileRequest {
                render: Some(RenderContext {
                    current_version: "v1.0".to_string(),
                    versions: NavigationManifest::default(),
                }),
                ..prebuild
            };
            assert_eq!(compiler.compile(&build).unwrap(), CompileStatus::Failed);
        }
    }
}
