//! build command - Run the versioned documentation build

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::config::{BuildConfig, Overrides};
use crate::core::types::FilterSpec;
use crate::engine::{CompilerFlags, Orchestrator, OrchestratorOptions, SphinxCompiler};
use crate::git::RefCatalog;
use crate::ui::output::{self, Verbosity};

/// Arguments accepted by the build command, as parsed.
#[derive(Debug, Default)]
pub struct BuildArgs {
    pub local_conf: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub git_root: Option<PathBuf>,
    pub select: Vec<String>,
    pub exclude: Vec<String>,
    pub force: bool,
    pub prebuild: bool,
    pub no_prebuild: bool,
    pub main_ref: Option<String>,
    pub no_quiet: bool,
    pub verbose: bool,
    pub sphinx_command: Option<String>,
}

impl BuildArgs {
    /// Convert flag pairs and repeatable options into config overrides.
    ///
    /// Only explicitly passed flags become `Some`; everything else is
    /// left for the in-tree file and defaults.
    fn into_overrides(self) -> Overrides {
        Overrides {
            local_conf: self.local_conf,
            output_dir: self.output,
            git_root: self.git_root,
            select: (!self.select.is_empty()).then_some(self.select),
            exclude: (!self.exclude.is_empty()).then_some(self.exclude),
            force: self.force.then_some(true),
            prebuild: match (self.prebuild, self.no_prebuild) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            main_ref: self.main_ref,
            quiet: self.no_quiet.then_some(false),
            verbose: self.verbose.then_some(true),
            compiler_command: self.sphinx_command,
        }
    }
}

/// Run the full versioned build.
pub fn build(ctx: &Context, args: BuildArgs) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);

    if let Some(dir) = &ctx.cwd {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let config = BuildConfig::resolve(args.into_overrides())?;
    let catalog = RefCatalog::open(&config.git_root)?;
    let compiler = SphinxCompiler::with_command(&config.compiler_command);

    let options = OrchestratorOptions {
        source_dir: config.source_dir.clone(),
        output_root: config.output_dir.clone(),
        filter: FilterSpec {
            select: config.select.clone(),
            exclude: config.exclude.clone(),
            force: config.force,
        },
        prebuild: config.prebuild,
        main_ref: config.main_ref.clone(),
        flags: CompilerFlags {
            quiet: config.quiet,
            verbose: config.verbose,
        },
    };

    let mut orchestrator = Orchestrator::new(&catalog, &compiler, options);
    let report = orchestrator.run()?;

    if report.built.is_empty() {
        output::warn("nothing was built", verbosity);
    } else {
        output::success(
            format!(
                "Successfully built {}",
                output::format_versions(&report.built)
            ),
            verbosity,
        );
    }
    if report.redirect.is_none() && !report.built.is_empty() {
        output::warn(
            format!(
                "main ref '{}' was not built; no top-level index.html",
                report.main_ref
            ),
            verbosity,
        );
    }

    Ok(())
}
