//! engine::manifest
//!
//! The navigation manifest: the registry of refs that actually built,
//! with the relative link every page uses to reach every other version.
//!
//! # Design
//!
//! Built once from recorded build results, then read-only for the rest of
//! the process. Each entry's link is `../{name}/index.html`, rooted at the
//! per-version output directory, so links are stable regardless of where a
//! given page lives inside one version's tree.
//!
//! Entries are partitioned into tags and branches by the catalog's
//! classification. A name the catalog does not know (a forced pseudo
//! build, a detached commit) lands in the tag partition. Iteration order
//! is insertion order, which is build order, which is what any rendered
//! version menu shows.

use serde::{Deserialize, Serialize};

use crate::core::types::{RefHandle, RefKind};
use crate::git::RefCatalog;

/// One navigable version: its name and the relative link to its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLink {
    /// The ref name, as shown in navigation.
    pub name: String,
    /// Relative hyperlink from inside any version directory.
    pub link: String,
}

impl VersionLink {
    fn for_ref(name: &str) -> Self {
        Self {
            name: name.to_string(),
            link: format!("../{}/index.html", name),
        }
    }
}

/// The shared registry of successfully built versions.
///
/// Immutable after construction; safe to hand to every per-page render
/// call. Serializable so it can ride the render context into the external
/// compiler.
///
/// # Example
///
/// ```
/// use verdocs::engine::manifest::NavigationManifest;
/// use verdocs::core::types::RefHandle;
///
/// let built = vec![RefHandle::tag("v1.0").unwrap()];
/// let manifest = NavigationManifest::from_handles(&built);
/// assert_eq!(manifest.tags()[0].link, "../v1.0/index.html");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationManifest {
    tags: Vec<VersionLink>,
    branches: Vec<VersionLink>,
}

impl NavigationManifest {
    /// Build a manifest from refs, classifying each against the catalog.
    ///
    /// The handles' own kinds are advisory (a pseudo handle may name a
    /// real branch checked out by revision); the catalog snapshot is the
    /// authority. Unknown names default to the tag partition.
    pub fn from_built(built: &[RefHandle], catalog: &RefCatalog) -> Self {
        let mut manifest = Self::default();
        for handle in built {
            let kind = catalog.classify(handle.name());
            match kind {
                Some(RefKind::Branch) => {
                    manifest.branches.push(VersionLink::for_ref(handle.name()));
                }
                Some(_) => {
                    manifest.tags.push(VersionLink::for_ref(handle.name()));
                }
                None => {
                    // Not in git history, but still passed through to the
                    // menu; grouped with tags.
                    tracing::debug!(
                        "'{}' not found in the catalog; listing it as a tag",
                        handle
                    );
                    manifest.tags.push(VersionLink::for_ref(handle.name()));
                }
            }
        }
        manifest
    }

    /// Build a manifest trusting the handles' own classification.
    ///
    /// Used when no catalog is at hand (tests, previews). Pseudo handles
    /// group with tags, as in [`NavigationManifest::from_built`].
    pub fn from_handles(handles: &[RefHandle]) -> Self {
        let mut manifest = Self::default();
        for handle in handles {
            match handle.kind() {
                RefKind::Branch => manifest.branches.push(VersionLink::for_ref(handle.name())),
                RefKind::Tag | RefKind::Pseudo => {
                    manifest.tags.push(VersionLink::for_ref(handle.name()))
                }
            }
        }
        manifest
    }

    /// Tag-classified versions, in build order.
    pub fn tags(&self) -> &[VersionLink] {
        &self.tags
    }

    /// Branch-classified versions, in build order.
    pub fn branches(&self) -> &[VersionLink] {
        &self.branches
    }

    /// All versions: tags followed by branches.
    pub fn iter(&self) -> impl Iterator<Item = &VersionLink> {
        self.tags.iter().chain(self.branches.iter())
    }

    /// Total number of versions.
    pub fn len(&self) -> usize {
        self.tags.len() + self.branches.len()
    }

    /// Whether no version built.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.branches.is_empty()
    }

    /// Whether a version of this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|v| v.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_are_relative_to_sibling_versions() {
        let link = VersionLink::for_ref("v1.0");
        assert_eq!(link.link, "../v1.0/index.html");
    }

    #[test]
    fn partitions_by_handle_kind() {
        let handles = vec![
            RefHandle::tag("v1.0").unwrap(),
            RefHandle::branch("main").unwrap(),
            RefHandle::tag("v2.0").unwrap(),
        ];
        let manifest = NavigationManifest::from_handles(&handles);
        let tags: Vec<_> = manifest.tags().iter().map(|v| v.name.as_str()).collect();
        let branches: Vec<_> = manifest.branches().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(tags, vec!["v1.0", "v2.0"]);
        assert_eq!(branches, vec!["main"]);
    }

    #[test]
    fn pseudo_handles_group_with_tags() {
        let handles = vec![RefHandle::pseudo("deadbeef").unwrap()];
        let manifest = NavigationManifest::from_handles(&handles);
        assert_eq!(manifest.tags().len(), 1);
        assert!(manifest.branches().is_empty());
        assert!(manifest.contains("deadbeef"));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let handles = vec![
            RefHandle::tag("v2.0").unwrap(),
            RefHandle::tag("v1.0").unwrap(),
        ];
        let manifest = NavigationManifest::from_handles(&handles);
        let names: Vec<_> = manifest.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["v2.0", "v1.0"]);
    }

    #[test]
    fn contains_and_len() {
        let handles = vec![
            RefHandle::tag("v1.0").unwrap(),
            RefHandle::branch("main").unwrap(),
        ];
        let manifest = NavigationManifest::from_handles(&handles);
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
        assert!(manifest.contains("main"));
        assert!(!manifest.contains("develop"));
    }

    #[test]
    fn empty_manifest() {
        let manifest = NavigationManifest::from_handles(&[]);
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn serializes_to_json() {
        let handles = vec![RefHandle::branch("main").unwrap()];
        let manifest = NavigationManifest::from_handles(&handles);
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("../main/index.html"));
        let back: NavigationManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
