//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RefHandle`] - One buildable unit: a branch, tag, or pseudo ref
//! - [`RefKind`] - Classification of a ref handle
//! - [`FilterSpec`] - Select/exclude glob patterns plus the force toggle
//! - [`BuildPhase`] - Pre-build (disposable) vs build (materialized)
//! - [`BuildOutcome`] - Result of one compiler invocation for one ref
//!
//! # Validation
//!
//! `RefHandle` enforces validity at construction time: the name of a
//! buildable unit is also a checkout target and an output directory name,
//! so an empty or control-character name cannot be represented.
//!
//! # Examples
//!
//! ```
//! use verdocs::core::types::{RefHandle, RefKind};
//!
//! let branch = RefHandle::branch("main").unwrap();
//! assert_eq!(branch.name(), "main");
//! assert_eq!(branch.kind(), RefKind::Branch);
//!
//! // A detached commit forced into the build set
//! let pseudo = RefHandle::pseudo("3f2a9c1").unwrap();
//! assert!(pseudo.is_pseudo());
//!
//! // Invalid names fail at creation time
//! assert!(RefHandle::branch("").is_err());
//! assert!(RefHandle::tag("v1 .0").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid ref name: {0}")]
    InvalidRefName(String),
}

/// Classification of a [`RefHandle`].
///
/// `Pseudo` refs represent a detached-HEAD commit or a forced, unverified
/// name. They may not correspond to any named ref in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// A local branch.
    Branch,
    /// A tag.
    Tag,
    /// A fabricated entry: detached commit or forced literal name.
    Pseudo,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RefKind::Branch => "branch",
            RefKind::Tag => "tag",
            RefKind::Pseudo => "pseudo",
        };
        write!(f, "{}", s)
    }
}

/// Identifies one buildable unit.
///
/// Created once per repository scan (or synthesized once when forcing a
/// name that matched nothing); immutable afterwards. The name doubles as
/// the checkout target and the per-version output directory name.
///
/// # Example
///
/// ```
/// use verdocs::core::types::{RefHandle, RefKind};
///
/// let tag = RefHandle::tag("v1.0").unwrap();
/// assert_eq!(tag.to_string(), "v1.0");
/// assert_eq!(tag.kind(), RefKind::Tag);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefHandle {
    name: String,
    kind: RefKind,
}

impl RefHandle {
    /// Create a handle with an explicit kind.
    pub fn new(name: impl Into<String>, kind: RefKind) -> Result<Self, TypeError> {
        let name = name.into();
        validate_ref_name(&name)?;
        Ok(Self { name, kind })
    }

    /// Create a branch handle.
    pub fn branch(name: impl Into<String>) -> Result<Self, TypeError> {
        Self::new(name, RefKind::Branch)
    }

    /// Create a tag handle.
    pub fn tag(name: impl Into<String>) -> Result<Self, TypeError> {
        Self::new(name, RefKind::Tag)
    }

    /// Create a pseudo handle for a detached commit or a forced name.
    pub fn pseudo(name: impl Into<String>) -> Result<Self, TypeError> {
        Self::new(name, RefKind::Pseudo)
    }

    /// The ref name (branch or tag name, or the synthesized identifier).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The classification of this handle.
    pub fn kind(&self) -> RefKind {
        self.kind
    }

    /// Whether this handle was fabricated rather than read from the catalog.
    pub fn is_pseudo(&self) -> bool {
        self.kind == RefKind::Pseudo
    }
}

impl std::fmt::Display for RefHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validate a ref name for use as checkout target and output directory.
///
/// Rules (subset of `git check-ref-format`, plus path safety):
/// - Cannot be empty
/// - Cannot contain whitespace or ASCII control characters
/// - Cannot contain `..` or be `.`
/// - Cannot start with `-` (would parse as a flag)
fn validate_ref_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidRefName("empty name".to_string()));
    }
    if name == "." || name.contains("..") {
        return Err(TypeError::InvalidRefName(format!(
            "path traversal in '{}'",
            name
        )));
    }
    if name.starts_with('-') {
        return Err(TypeError::InvalidRefName(format!(
            "'{}' starts with '-'",
            name
        )));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_ascii_control())
    {
        return Err(TypeError::InvalidRefName(format!(
            "whitespace or control character in '{}'",
            name
        )));
    }
    Ok(())
}

/// Select/exclude patterns applied against the catalog.
///
/// Consumed once by the filter. `force` fabricates pseudo entries for
/// select patterns that match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Glob patterns selecting refs to build. Empty means "all refs".
    pub select: Vec<String>,
    /// Glob patterns removing refs after selection. Always win over select.
    pub exclude: Vec<String>,
    /// Fabricate pseudo entries for select patterns matching nothing.
    pub force: bool,
}

impl FilterSpec {
    /// A spec that passes every ref through.
    pub fn all() -> Self {
        Self::default()
    }
}

/// Which kind of compiler invocation an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Disposable dry-run; output is discarded.
    PreBuild,
    /// Real build; output is materialized into the output tree.
    Build,
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildPhase::PreBuild => write!(f, "pre-build"),
            BuildPhase::Build => write!(f, "build"),
        }
    }
}

/// Result of one compiler invocation for one ref.
///
/// Never mutated after creation; the orchestrator accumulates these into
/// its per-phase sequences.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// The ref that was built.
    pub handle: RefHandle,
    /// Which phase produced this outcome.
    pub phase: BuildPhase,
    /// Whether the compiler exited successfully.
    pub success: bool,
}
