//! engine::filter
//!
//! Select/exclude filtering of the catalog's ref listing.
//!
//! # Semantics
//!
//! - Empty select list: the working set is every catalog ref minus
//!   exclude matches.
//! - Non-empty select list: patterns are processed in order; each pattern
//!   appends its catalog matches (catalog order within one pattern). A
//!   pattern matching nothing either synthesizes a pseudo handle for the
//!   literal pattern text (`force`) or is recorded as unmatched and
//!   skipped (non-fatal; the run continues without it).
//! - Excludes are applied after selection against the already-selected
//!   names and always win, regardless of ordering in the spec.
//! - Overlapping select patterns are de-duplicated by name; the first
//!   match fixes a ref's position.
//!
//! Pattern matching uses `glob::Pattern` against the bare ref name.

use glob::Pattern;

use crate::core::types::{FilterSpec, RefHandle};

/// Result of applying a [`FilterSpec`] to the catalog listing.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// The working set, in build order.
    pub selected: Vec<RefHandle>,
    /// Select patterns that matched nothing (force off). Logged by the
    /// caller; these contribute nothing to the working set.
    pub unmatched: Vec<String>,
}

/// Apply include/exclude patterns to the catalog's ref listing.
///
/// Invalid glob patterns are treated as literal names: a select pattern
/// that is not valid glob syntax can still match (or force) a ref of
/// exactly that name.
///
/// # Example
///
/// ```
/// use verdocs::core::types::{FilterSpec, RefHandle};
/// use verdocs::engine::filter::apply;
///
/// let refs = vec![
///     RefHandle::tag("v1.0").unwrap(),
///     RefHandle::tag("v2.0").unwrap(),
///     RefHandle::branch("main").unwrap(),
/// ];
/// let spec = FilterSpec {
///     select: vec!["v*".to_string(), "main".to_string()],
///     exclude: vec!["v2.0".to_string()],
///     force: false,
/// };
/// let outcome = apply(&refs, &spec);
/// let names: Vec<_> = outcome.selected.iter().map(|r| r.name()).collect();
/// assert_eq!(names, vec!["v1.0", "main"]);
/// ```
pub fn apply(all_refs: &[RefHandle], spec: &FilterSpec) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    if spec.select.is_empty() {
        outcome.selected = all_refs.to_vec();
    } else {
        for pattern in &spec.select {
            let matches = match_refs(all_refs, pattern);
            if !matches.is_empty() {
                for handle in matches {
                    if !outcome.selected.iter().any(|r| r.name() == handle.name()) {
                        outcome.selected.push(handle.clone());
                    }
                }
            } else if spec.force {
                tracing::warn!(
                    "forcing build for '{}'; it may not exist in the repository",
                    pattern
                );
                match RefHandle::pseudo(pattern.as_str()) {
                    Ok(handle) => {
                        if !outcome.selected.iter().any(|r| r.name() == handle.name()) {
                            outcome.selected.push(handle);
                        }
                    }
                    Err(err) => {
                        tracing::error!("cannot force '{}': {}", pattern, err);
                        outcome.unmatched.push(pattern.clone());
                    }
                }
            } else {
                outcome.unmatched.push(pattern.clone());
            }
        }
    }

    if !spec.exclude.is_empty() {
        outcome
            .selected
            .retain(|handle| !spec.exclude.iter().any(|p| name_matches(handle.name(), p)));
    }

    outcome
}

/// Refs whose names match `pattern`, in catalog order.
fn match_refs<'a>(refs: &'a [RefHandle], pattern: &str) -> Vec<&'a RefHandle> {
    refs.iter()
        .filter(|r| name_matches(r.name(), pattern))
        .collect()
}

/// Glob-match a ref name, falling back to literal comparison for patterns
/// that are not valid glob syntax.
fn name_matches(name: &str, pattern: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(p) => p.matches(name),
        Err(_) => name == pattern,
    }
}
