//! Integration tests for the ref catalog.
//!
//! These tests use real git repositories created via tempfile to verify
//! that the catalog works correctly with actual git operations.

mod common;

use common::TestRepo;
use tempfile::TempDir;

use verdocs::core::types::RefKind;
use verdocs::git::{CatalogError, RefCatalog, WorkingTreeCursor};

#[test]
fn lists_tags_before_branches() {
    let repo = TestRepo::with_versions();
    repo.create_branch("develop");

    let catalog = RefCatalog::open(repo.path()).unwrap();
    let refs = catalog.list_refs();
    let listed: Vec<(String, RefKind)> = refs
        .iter()
        .map(|r| (r.name().to_string(), r.kind()))
        .collect();

    assert_eq!(
        listed,
        vec![
            ("v1.0".to_string(), RefKind::Tag),
            ("v2.0".to_string(), RefKind::Tag),
            ("develop".to_string(), RefKind::Branch),
            ("main".to_string(), RefKind::Branch),
        ]
    );
}

#[test]
fn snapshot_is_one_shot() {
    let repo = TestRepo::with_versions();
    let catalog = RefCatalog::open(repo.path()).unwrap();

    // A tag created after open is invisible to this catalog.
    repo.tag("v3.0");
    assert!(!catalog.tag_names().iter().any(|t| t == "v3.0"));
    assert_eq!(catalog.list_refs().len(), 3);
}

#[test]
fn classify_prefers_tags_on_name_collision() {
    let repo = TestRepo::with_versions();
    repo.create_branch("dual");
    repo.tag("dual");

    let catalog = RefCatalog::open(repo.path()).unwrap();
    assert_eq!(catalog.classify("dual"), Some(RefKind::Tag));
    assert_eq!(catalog.classify("main"), Some(RefKind::Branch));
    assert_eq!(catalog.classify("nope"), None);
}

#[test]
fn home_ref_on_branch() {
    let repo = TestRepo::with_versions();
    let catalog = RefCatalog::open(repo.path()).unwrap();

    let home = catalog.home_ref().unwrap();
    assert_eq!(home.name(), "main");
    assert_eq!(home.kind(), RefKind::Branch);
    assert!(!catalog.is_detached());
}

#[test]
fn home_ref_on_detached_head_is_pseudo() {
    let repo = TestRepo::with_versions();
    repo.detach();

    let catalog = RefCatalog::open(repo.path()).unwrap();
    assert!(catalog.is_detached());

    let home = catalog.home_ref().unwrap();
    assert_eq!(home.kind(), RefKind::Pseudo);
    assert!(repo.head_oid().starts_with(home.name()));
}

#[test]
fn checkout_switches_working_tree() {
    let repo = TestRepo::with_versions();
    let catalog = RefCatalog::open(repo.path()).unwrap();

    catalog.checkout("v1.0").unwrap();
    assert_eq!(repo.checked_out_version(), "v1.0");

    catalog.checkout("main").unwrap();
    assert_eq!(repo.checked_out_version(), "main");
    assert_eq!(repo.current_ref(), "main");
}

#[test]
fn checkout_commit_id_detaches() {
    let repo = TestRepo::with_versions();
    let oid = repo.head_oid();
    let catalog = RefCatalog::open(repo.path()).unwrap();

    catalog.checkout(&oid[..7]).unwrap();
    assert_eq!(repo.current_ref(), "HEAD");
    assert_eq!(repo.head_oid(), oid);
}

#[test]
fn checkout_unknown_name_fails() {
    let repo = TestRepo::with_versions();
    let catalog = RefCatalog::open(repo.path()).unwrap();

    let err = catalog.checkout("deadbeef").unwrap_err();
    assert!(matches!(err, CatalogError::CheckoutFailed { .. }));
    // The tree is untouched.
    assert_eq!(repo.current_ref(), "main");
}

#[test]
fn open_fails_outside_a_repository() {
    let dir = TempDir::new().unwrap();
    let err = RefCatalog::open(dir.path()).unwrap_err();
    assert!(matches!(err, CatalogError::RepositoryUnavailable { .. }));
}

#[test]
fn open_fails_on_repository_without_commits() {
    let dir = TempDir::new().unwrap();
    common::run_git(dir.path(), &["init"]);

    let err = RefCatalog::open(dir.path()).unwrap_err();
    assert!(matches!(err, CatalogError::RepositoryUnavailable { .. }));
}

#[test]
fn cursor_restores_the_home_ref() {
    let repo = TestRepo::with_versions();
    let catalog = RefCatalog::open(repo.path()).unwrap();
    let cursor = WorkingTreeCursor::capture(&catalog).unwrap();
    assert_eq!(cursor.home().name(), "main");

    catalog.checkout("v1.0").unwrap();
    assert_eq!(repo.checked_out_version(), "v1.0");

    cursor.restore(&catalog).unwrap();
    assert_eq!(repo.current_ref(), "main");
    assert_eq!(repo.checked_out_version(), "main");
}

#[test]
fn cursor_restores_a_detached_home() {
    let repo = TestRepo::with_versions();
    repo.detach();
    let oid = repo.head_oid();

    let catalog = RefCatalog::open(repo.path()).unwrap();
    let cursor = WorkingTreeCursor::capture(&catalog).unwrap();

    catalog.checkout("v1.0").unwrap();
    cursor.restore(&catalog).unwrap();

    assert_eq!(repo.current_ref(), "HEAD");
    assert_eq!(repo.head_oid(), oid);
}
