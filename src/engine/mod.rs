//! engine
//!
//! Build orchestration: filtering, the compiler boundary, per-ref build
//! transactions, the navigation manifest, and the phase machine that
//! sequences them.
//!
//! # Architecture
//!
//! ```text
//! RefCatalog -> filter -> Orchestrator
//!                           |-- pre-build pass (BuildExecutor, disposable)
//!                           |-- build pass     (BuildExecutor, materialized)
//!                           |-- NavigationManifest (successful refs only)
//!                           `-- top-level redirect page
//! ```
//!
//! Execution is strictly sequential per ref: the on-disk checkout is a
//! single process-wide mutable resource, so there is no parallel build
//! mode. The only blocking operations are the synchronous compiler
//! subprocess and filesystem work.

pub mod compiler;
pub mod executor;
pub mod filter;
pub mod manifest;
pub mod orchestrator;

pub use compiler::{
    CompileRequest, CompileStatus, CompilerError, CompilerFlags, DocCompiler, MockCompiler,
    RenderContext, SphinxCompiler,
};
pub use executor::{BuildExecutor, ExecuteError};
pub use filter::FilterOutcome;
pub use manifest::{NavigationManifest, VersionLink};
pub use orchestrator::{
    BuildReport, OrchestrateError, Orchestrator, OrchestratorOptions, Phase,
};
