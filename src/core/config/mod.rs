//! core::config
//!
//! Run configuration: which refs to build, where sources and output live,
//! and how the external compiler is invoked.
//!
//! # Precedence
//!
//! Values are resolved in this order (later fills gaps, never overrides):
//! 1. CLI flags (an explicitly passed flag always wins)
//! 2. `verdocs.toml` next to the documentation `conf.py`
//! 3. Built-in defaults
//!
//! The file lets a project pin its version policy (selects, excludes,
//! main ref) in-tree while the command line stays short.
//!
//! # Source configuration file
//!
//! The external compiler reads its own configuration from `conf.py`. The
//! `--local-conf` value may point at the file or its directory; either
//! way it normalizes to the file, and a missing file is fatal before any
//! repository work starts.
//!
//! # Example
//!
//! ```no_run
//! use verdocs::core::config::{BuildConfig, Overrides};
//!
//! let config = BuildConfig::resolve(Overrides::default()).unwrap();
//! println!("output: {}", config.output_dir.display());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default location of the compiler configuration file.
pub const DEFAULT_LOCAL_CONF: &str = "docs/conf.py";

/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "docs/_build";

/// Name of the optional in-tree configuration file.
pub const CONFIG_FILE_NAME: &str = "verdocs.toml";

/// Default external compiler command.
pub const DEFAULT_COMPILER_COMMAND: &str = "sphinx-build";

/// Errors from configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The compiler configuration file is not where it should be.
    #[error("conf.py does not exist at {path}")]
    SourceMissing {
        /// The normalized path that was checked.
        path: PathBuf,
    },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Values explicitly provided on the command line.
///
/// `None` means "not passed"; those gaps are filled from the in-tree file
/// and then from defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Path to `conf.py` or its directory.
    pub local_conf: Option<PathBuf>,
    /// Output root path.
    pub output_dir: Option<PathBuf>,
    /// Repository root path.
    pub git_root: Option<PathBuf>,
    /// Select patterns.
    pub select: Option<Vec<String>>,
    /// Exclude patterns.
    pub exclude: Option<Vec<String>>,
    /// Force building refs that match nothing.
    pub force: Option<bool>,
    /// Run the pre-build pass.
    pub prebuild: Option<bool>,
    /// Home label for the top-level redirect.
    pub main_ref: Option<String>,
    /// Suppress compiler output.
    pub quiet: Option<bool>,
    /// Extra-verbose compiler output.
    pub verbose: Option<bool>,
    /// External compiler command.
    pub compiler_command: Option<String>,
}

/// In-tree configuration file schema (`verdocs.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct FileConfig {
    output: Option<PathBuf>,
    git_root: Option<PathBuf>,
    select: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    force: Option<bool>,
    prebuild: Option<bool>,
    main_ref: Option<String>,
    #[serde(default)]
    compiler: CompilerSection,
}

/// `[compiler]` table of the in-tree file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct CompilerSection {
    command: Option<String>,
    quiet: Option<bool>,
    verbose: Option<bool>,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Normalized path to `conf.py` (always the file, never the dir).
    pub local_conf: PathBuf,
    /// Directory containing `conf.py`; handed to the compiler as source.
    pub source_dir: PathBuf,
    /// Root of the versioned output tree.
    pub output_dir: PathBuf,
    /// Repository root; the process cwd when absent.
    pub git_root: PathBuf,
    /// Select patterns.
    pub select: Vec<String>,
    /// Exclude patterns.
    pub exclude: Vec<String>,
    /// Force building refs that match nothing.
    pub force: bool,
    /// Run the pre-build pass.
    pub prebuild: bool,
    /// Home label for the top-level redirect, when configured.
    pub main_ref: Option<String>,
    /// Suppress compiler output.
    pub quiet: bool,
    /// Extra-verbose compiler output.
    pub verbose: bool,
    /// External compiler command.
    pub compiler_command: String,
}

impl BuildConfig {
    /// Resolve configuration from CLI overrides, the in-tree file, and
    /// defaults, then verify the compiler configuration file exists.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::SourceMissing`] if `conf.py` is absent (fatal
    ///   before any filtering or build work)
    /// - [`ConfigError::ReadError`] / [`ConfigError::ParseError`] for a
    ///   present-but-broken `verdocs.toml`
    pub fn resolve(overrides: Overrides) -> Result<Self, ConfigError> {
        let local_conf = normalize_conf_path(
            overrides
                .local_conf
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_CONF)),
        );
        let source_dir = local_conf
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let file = load_file_config(&source_dir.join(CONFIG_FILE_NAME))?;

        if !local_conf.exists() {
            return Err(ConfigError::SourceMissing { path: local_conf });
        }
        tracing::debug!("located {}", local_conf.display());

        let git_root = overrides
            .git_root
            .or(file.git_root)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            source_dir,
            local_conf,
            output_dir: overrides
                .output_dir
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            git_root,
            select: overrides.select.or(file.select).unwrap_or_default(),
            exclude: overrides.exclude.or(file.exclude).unwrap_or_default(),
            force: overrides.force.or(file.force).unwrap_or(false),
            prebuild: overrides.prebuild.or(file.prebuild).unwrap_or(true),
            main_ref: overrides.main_ref.or(file.main_ref),
            quiet: overrides.quiet.or(file.compiler.quiet).unwrap_or(true),
            verbose: overrides
                .verbose
                .or(file.compiler.verbose)
                .unwrap_or(false),
            compiler_command: overrides
                .compiler_command
                .or(file.compiler.command)
                .unwrap_or_else(|| DEFAULT_COMPILER_COMMAND.to_string()),
        })
    }
}

/// Accept either `conf.py` itself or the directory containing it.
fn normalize_conf_path(path: PathBuf) -> PathBuf {
    if path.file_name().map(|n| n == "conf.py").unwrap_or(false) {
        path
    } else {
        path.join("conf.py")
    }
}

/// Load the in-tree file when present; absence is not an error.
fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = toml::from_str(&raw).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::debug!("loaded {}", path.display());
    Ok(parsed)
}
