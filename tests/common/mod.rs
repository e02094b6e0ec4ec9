//! Shared test fixture: real git repositories created via tempfile.
//!
//! Repositories are driven through the `git` CLI so the tests verify the
//! catalog against actual git behavior, not against git2's own writes.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Test fixture that creates a real git repository with a docs tree.
///
/// Every commit carries `docs/conf.py` (so configuration resolution works
/// from any checkout) and `docs/.version`, a marker naming the version the
/// checkout belongs to. The marker is what the mock compiler and the
/// restoration assertions read.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit on `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        let repo = Self { dir };
        repo.write_docs("main");
        repo.commit("initial docs");
        // Normalize the branch name regardless of init.defaultBranch.
        run_git(repo.path(), &["branch", "-M", "main"]);
        repo
    }

    /// A repository with tags `v1.0`, `v2.0` and branch `main`.
    ///
    /// Each tag points at a commit whose `docs/.version` names it, so any
    /// checkout identifies itself on disk.
    pub fn with_versions() -> Self {
        let repo = Self::new();

        repo.write_docs("v1.0");
        repo.commit("docs for 1.0");
        repo.tag("v1.0");

        repo.write_docs("v2.0");
        repo.commit("docs for 2.0");
        repo.tag("v2.0");

        repo.write_docs("main");
        repo.commit("docs for main");
        repo
    }

    /// Get the path to the repository.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The docs source directory (the conf dir).
    pub fn docs_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("docs")
    }

    /// Write the docs tree for a version and stage nothing else.
    pub fn write_docs(&self, version: &str) {
        let docs = self.docs_dir();
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::write(docs.join("conf.py"), format!("project = '{}'\n", version)).unwrap();
        std::fs::write(docs.join(".version"), version).unwrap();
    }

    /// Stage everything and commit.
    pub fn commit(&self, message: &str) {
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "-m", message]);
    }

    /// Create a tag at the current HEAD.
    pub fn tag(&self, name: &str) {
        run_git(self.path(), &["tag", name]);
    }

    /// Create a branch at the current HEAD.
    pub fn create_branch(&self, name: &str) {
        run_git(self.path(), &["branch", name]);
    }

    /// Checkout a ref.
    pub fn checkout(&self, name: &str) {
        run_git(self.path(), &["checkout", name]);
    }

    /// Detach HEAD at the current commit.
    pub fn detach(&self) {
        let oid = self.head_oid();
        run_git(self.path(), &["checkout", &oid]);
    }

    /// Get HEAD OID using git directly.
    pub fn head_oid(&self) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(self.path())
            .output()
            .expect("git rev-parse failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    /// The symbolic name of the active ref, or "HEAD" when detached.
    pub fn current_ref(&self) -> String {
        let output = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(self.path())
            .output()
            .expect("git rev-parse failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    /// The version marker of the checkout currently on disk.
    pub fn checked_out_version(&self) -> String {
        std::fs::read_to_string(self.docs_dir().join(".version"))
            .unwrap()
            .trim()
            .to_string()
    }
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
