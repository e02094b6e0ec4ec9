//! git::catalog
//!
//! Ref catalog implementation using git2.
//!
//! This module is the **single doorway** to all Git operations in verdocs.
//! No other module imports `git2`. The catalog wraps one repository and
//! provides exactly what the build orchestration needs:
//!
//! - A one-shot snapshot of tag and branch names, taken at open time
//! - The "home" ref (restoration target), even on a detached HEAD
//! - Force checkout of named refs and raw revisions
//! - Tag/branch classification for the navigation manifest
//!
//! # Snapshot semantics
//!
//! The tag/branch listing is captured once when the catalog is opened and
//! never re-queried mid-run. A run therefore operates on a consistent view
//! of the repository even though checkouts mutate the working tree.
//!
//! # The working tree is a global resource
//!
//! `checkout` mutates the on-disk working tree. The orchestrator owns the
//! tree exclusively for the duration of a run and serializes all
//! checkout/build/restore sequences; see [`WorkingTreeCursor`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{RefHandle, RefKind, TypeError};

/// Length of abbreviated commit ids used for detached-HEAD pseudo refs.
const SHORT_ID_LEN: usize = 7;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Repository missing, bare with no fallback, or without commits.
    #[error("repository unavailable at {path}: {reason}")]
    RepositoryUnavailable {
        /// The path that was searched.
        path: PathBuf,
        /// Why the repository cannot be used.
        reason: String,
    },

    /// A checkout target did not resolve or the tree switch failed.
    #[error("checkout failed for '{refname}': {message}")]
    CheckoutFailed {
        /// The ref or revision that was requested.
        refname: String,
        /// The underlying failure.
        message: String,
    },

    /// A ref name read from the repository failed validation.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message.
        message: String,
    },
}

impl CatalogError {
    fn internal(err: &git2::Error) -> Self {
        CatalogError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// The ref catalog.
///
/// Wraps the version-control repository: lists branches and tags, resolves
/// the active ref, performs checkouts, and synthesizes a pseudo ref for a
/// detached-HEAD commit so callers always have a restoration target.
///
/// # Example
///
/// ```ignore
/// use verdocs::git::RefCatalog;
/// use std::path::Path;
///
/// let catalog = RefCatalog::open(Path::new("."))?;
/// for handle in catalog.list_refs() {
///     println!("{} ({})", handle, handle.kind());
/// }
/// ```
pub struct RefCatalog {
    /// The underlying git2 repository.
    repo: git2::Repository,
    /// Tag names at open time, repository-reported order.
    tags: Vec<String>,
    /// Local branch names at open time, repository-reported order.
    branches: Vec<String>,
}

impl std::fmt::Debug for RefCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefCatalog")
            .field("path", &self.repo.path())
            .field("tags", &self.tags.len())
            .field("branches", &self.branches.len())
            .finish()
    }
}

impl RefCatalog {
    /// Open the repository at (or above) `root` and snapshot its refs.
    ///
    /// If the repository found at `root` is bare, the process working
    /// directory is tried as a fallback before giving up, so running from
    /// inside a checkout with a `--git-root` pointing at a mirror still
    /// works.
    ///
    /// # Errors
    ///
    /// [`CatalogError::RepositoryUnavailable`] if no usable repository is
    /// found, the fallback is also bare, or the repository has no commits.
    pub fn open(root: &Path) -> Result<Self, CatalogError> {
        let mut repo = git2::Repository::discover(root).map_err(|e| {
            CatalogError::RepositoryUnavailable {
                path: root.to_path_buf(),
                reason: e.message().to_string(),
            }
        })?;

        if repo.is_bare() {
            let cwd = std::env::current_dir().map_err(|e| CatalogError::Internal {
                message: e.to_string(),
            })?;
            tracing::debug!(
                "repository at {} is bare; falling back to {}",
                root.display(),
                cwd.display()
            );
            repo = git2::Repository::discover(&cwd).map_err(|e| {
                CatalogError::RepositoryUnavailable {
                    path: cwd.clone(),
                    reason: e.message().to_string(),
                }
            })?;
            if repo.is_bare() {
                return Err(CatalogError::RepositoryUnavailable {
                    path: cwd,
                    reason: "bare repository".to_string(),
                });
            }
        }

        // A repository without commits has nothing to build or restore to.
        if repo.head().is_err() {
            return Err(CatalogError::RepositoryUnavailable {
                path: root.to_path_buf(),
                reason: "repository has no commits".to_string(),
            });
        }

        let (tags, branches) = snapshot_refs(&repo)?;
        tracing::debug!(
            "catalog snapshot: {} tags, {} branches",
            tags.len(),
            branches.len()
        );

        Ok(Self {
            repo,
            tags,
            branches,
        })
    }

    /// The repository's working directory.
    pub fn work_dir(&self) -> Result<&Path, CatalogError> {
        self.repo.workdir().ok_or(CatalogError::Internal {
            message: "repository has no working directory".to_string(),
        })
    }

    /// All refs known at open time: every tag followed by every branch.
    ///
    /// The order is the repository-reported order within each group and
    /// determines build sequence and menu rendering order downstream.
    pub fn list_refs(&self) -> Vec<RefHandle> {
        let mut refs = Vec::with_capacity(self.tags.len() + self.branches.len());
        for name in &self.tags {
            if let Ok(handle) = RefHandle::tag(name.as_str()) {
                refs.push(handle);
            }
        }
        for name in &self.branches {
            if let Ok(handle) = RefHandle::branch(name.as_str()) {
                refs.push(handle);
            }
        }
        refs
    }

    /// Tag names in the snapshot.
    pub fn tag_names(&self) -> &[String] {
        &self.tags
    }

    /// Branch names in the snapshot.
    pub fn branch_names(&self) -> &[String] {
        &self.branches
    }

    /// Classify a name against the snapshot.
    ///
    /// Returns `None` for names absent from the snapshot (e.g. forced
    /// pseudo builds). When a tag and a branch share a name, the tag wins:
    /// tags are listed first and the tie-break keeps classification
    /// consistent with listing order.
    pub fn classify(&self, name: &str) -> Option<RefKind> {
        if self.tags.iter().any(|t| t == name) {
            Some(RefKind::Tag)
        } else if self.branches.iter().any(|b| b == name) {
            Some(RefKind::Branch)
        } else {
            None
        }
    }

    /// The ref active in the working tree right now.
    ///
    /// On a detached HEAD this produces a `Pseudo` handle carrying the
    /// abbreviated commit id rather than failing, so callers always have
    /// a restoration target.
    pub fn home_ref(&self) -> Result<RefHandle, CatalogError> {
        let head = self.repo.head().map_err(|e| CatalogError::internal(&e))?;

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(RefHandle::branch(name)?);
            }
        }

        // Detached HEAD: synthesize a pseudo handle from the commit id.
        let oid = head
            .peel_to_commit()
            .map_err(|e| CatalogError::internal(&e))?
            .id()
            .to_string();
        let short = &oid[..SHORT_ID_LEN.min(oid.len())];
        Ok(RefHandle::pseudo(short)?)
    }

    /// Whether the working tree is on a detached HEAD.
    pub fn is_detached(&self) -> bool {
        self.repo.head_detached().unwrap_or(false)
    }

    /// Switch the working tree to the named ref or revision.
    ///
    /// Resolves through revparse, so branch names, tag names, and raw
    /// commit ids (forced pseudo builds) all work. Named refs move HEAD to
    /// the ref; anything else detaches HEAD at the resolved commit. The
    /// checkout is forced: the working tree is made to match the target.
    ///
    /// # Errors
    ///
    /// [`CatalogError::CheckoutFailed`] if the name does not resolve or
    /// the tree switch fails.
    pub fn checkout(&self, name: &str) -> Result<(), CatalogError> {
        let (object, reference) =
            self.repo
                .revparse_ext(name)
                .map_err(|e| CatalogError::CheckoutFailed {
                    refname: name.to_string(),
                    message: e.message().to_string(),
                })?;

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.force();
        self.repo
            .checkout_tree(&object, Some(&mut opts))
            .map_err(|e| CatalogError::CheckoutFailed {
                refname: name.to_string(),
                message: e.message().to_string(),
            })?;

        let result = match reference.and_then(|r| r.name().map(String::from)) {
            Some(refname) => self.repo.set_head(&refname),
            None => self.repo.set_head_detached(object.id()),
        };
        result.map_err(|e| CatalogError::CheckoutFailed {
            refname: name.to_string(),
            message: e.message().to_string(),
        })?;

        tracing::debug!("checked out '{}'", name);
        Ok(())
    }
}

/// Snapshot tag and branch names from the repository.
fn snapshot_refs(repo: &git2::Repository) -> Result<(Vec<String>, Vec<String>), CatalogError> {
    let mut tags = Vec::new();
    let tag_names = repo
        .tag_names(None)
        .map_err(|e| CatalogError::internal(&e))?;
    for name in tag_names.iter().flatten() {
        tags.push(name.to_string());
    }

    let mut branches = Vec::new();
    let iter = repo
        .branches(Some(git2::BranchType::Local))
        .map_err(|e| CatalogError::internal(&e))?;
    for branch in iter {
        let (branch, _) = branch.map_err(|e| CatalogError::internal(&e))?;
        if let Some(name) = branch.name().ok().flatten() {
            branches.push(name.to_string());
        }
    }

    Ok((tags, branches))
}

/// Tracks the ref checked out before orchestration began.
///
/// Guarantees a restoration target after every build attempt and at
/// process end, regardless of success or failure. Restoring after every
/// single attempt (rather than only at the very end) keeps the tree as
/// close to original as possible even on a mid-loop abort.
#[derive(Debug, Clone)]
pub struct WorkingTreeCursor {
    home: RefHandle,
}

impl WorkingTreeCursor {
    /// Capture the currently active ref as the home ref.
    pub fn capture(catalog: &RefCatalog) -> Result<Self, CatalogError> {
        let home = catalog.home_ref()?;
        tracing::debug!("home ref is '{}'", home);
        Ok(Self { home })
    }

    /// The home ref this cursor restores to.
    pub fn home(&self) -> &RefHandle {
        &self.home
    }

    /// Check the working tree out at the home ref.
    pub fn restore(&self, catalog: &RefCatalog) -> Result<(), CatalogError> {
        catalog.checkout(self.home.name())
    }
}
