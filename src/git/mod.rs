//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Repository reads and the
//! one write verdocs performs (switching the working tree between refs)
//! flow through [`RefCatalog`]. No other module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening (with bare-repo fallback)
//! - One-shot tag/branch snapshot and classification
//! - Home-ref resolution, including detached HEAD
//! - Forced checkout of refs and raw revisions
//! - Working-tree restoration via [`WorkingTreeCursor`]
//!
//! # Invariants
//!
//! - The snapshot is taken once per catalog and never refreshed mid-run
//! - Checkouts are serialized by the orchestrator; the catalog itself
//!   performs no locking

mod catalog;

pub use catalog::{CatalogError, RefCatalog, WorkingTreeCursor};
