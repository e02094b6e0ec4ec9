//! Verdocs - versioned documentation builds for git repositories
//!
//! Verdocs builds every selected branch and tag of a Sphinx documentation
//! tree into one static site: each version lands in its own subdirectory,
//! every page can link to every other built version, and a top-level
//! `index.html` redirects to the main ref.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates)
//! - [`engine`] - Filtering, build transactions, the two-phase
//!   orchestration workflow, and the navigation manifest
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output formatting and logging setup
//!
//! # Correctness Invariants
//!
//! Verdocs maintains the following invariants:
//!
//! 1. Builds are strictly sequential: the working tree is one process-wide
//!    mutable resource and is never checked out concurrently
//! 2. The working tree is restored to the home ref after every build
//!    attempt, so every non-crash exit leaves it where the user had it
//! 3. The navigation manifest contains exactly the refs whose real build
//!    succeeded - no more, no less
//! 4. Scratch directories are scoped to one build transaction and removed
//!    on every exit path

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
