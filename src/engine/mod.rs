//! Orchestration engine.
//!
//! The engine owns the ordered pipeline registry, the file I/O facade,
//! and the completion notifier. It is constructed explicitly by the
//! process entry point and passed by reference to collaborators.
//!
//! # Overview
//!
//! A full build discovers the source tree, routes every file into the
//! registered pipelines, then walks them sequentially:
//!
//! ```ignore
//! let mut engine = Engine::new(&config, project_root);
//! engine.pick("**/*.js")?.tag("scripts").pipe(Box::new(CopyTransformer::new())).seal();
//! engine.rest().tag("assets").seal();
//! engine.on_complete(|files| println!("{} artifacts", files.len()));
//! let report = engine.build()?;
//! ```
//!
//! Incremental rebuilds feed change notifications through
//! [`Engine::apply_diffs`] instead of re-discovering the tree.

pub mod discovery;
pub mod notifier;
pub mod pipeline;
pub mod registry;
pub mod router;
pub mod walker;

pub use discovery::DiscoveryError;
pub use pipeline::{FileRecord, FileSet, Pipeline, PipelineRole};
pub use registry::{PipelineRegistry, RegistrationError};
pub use router::{Diff, DiffKind};
pub use walker::{BuildError, WalkReport};

use crate::config::SiftConfig;
use crate::io::FileIo;
use crate::transform::Transformer;
use notifier::Notifier;
use std::path::{Path, PathBuf};

/// The orchestrator: registry, facade, notifier, and the two build paths.
pub struct Engine {
    io: FileIo,
    cwd: PathBuf,
    output: String,
    registry: PipelineRegistry,
    notifier: Notifier,
    verbose: bool,
}

impl Engine {
    /// Create an engine from configuration, resolving the working
    /// directory against the project root.
    pub fn new(config: &SiftConfig, project_root: &Path) -> Self {
        let cwd = if config.project.cwd.is_absolute() {
            config.project.cwd.clone()
        } else {
            project_root.join(&config.project.cwd)
        };
        let io = FileIo::new(cwd.clone(), &config.project.output, &config.project.binary_resource);
        Self {
            io,
            cwd,
            output: config.project.output.clone(),
            registry: PipelineRegistry::new(),
            notifier: Notifier::new(),
            verbose: false,
        }
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The resolved working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The output directory name.
    pub fn output_name(&self) -> &str {
        &self.output
    }

    /// The file facade shared with every pipeline run.
    pub fn io(&self) -> &FileIo {
        &self.io
    }

    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    /// Start building a pattern-bound pipeline.
    ///
    /// Fails synchronously on an empty or invalid glob pattern. The
    /// pipeline is registered when the builder's [`PipelineBuilder::seal`]
    /// is called.
    pub fn pick(&mut self, pattern: &str) -> Result<PipelineBuilder<'_>, RegistrationError> {
        if pattern.trim().is_empty() {
            return Err(RegistrationError::EmptyPattern);
        }
        let compiled = glob::Pattern::new(pattern).map_err(|source| {
            RegistrationError::InvalidPattern { pattern: pattern.to_string(), source }
        })?;
        Ok(PipelineBuilder { engine: self, pipeline: Pipeline::patterned(pattern, compiled) })
    }

    /// Start building the catch-all pipeline. If sealed after another rest
    /// pipeline, this one takes over the rest role.
    pub fn rest(&mut self) -> PipelineBuilder<'_> {
        PipelineBuilder { engine: self, pipeline: Pipeline::rest("rest") }
    }

    /// Subscribe to the "build complete" event.
    pub fn on_complete(&mut self, callback: impl Fn(&[FileRecord]) + 'static) {
        self.notifier.subscribe(callback);
    }

    /// Full build: discover, bulk-route, walk, publish.
    pub fn build(&mut self) -> Result<WalkReport, BuildError> {
        let filenames = discovery::list_files(&self.cwd, &self.output)?;
        router::group_all(&mut self.registry, &filenames);
        let report = walker::walk(&self.registry, &self.io, self.verbose)?;
        self.notifier.emit(&report.files);
        Ok(report)
    }

    /// Incremental build: route a batch of diffs in order, then walk all
    /// registered pipelines and publish.
    ///
    /// Routing finishes for the entire batch before any pipeline runs.
    pub fn apply_diffs(&mut self, diffs: &[Diff]) -> Result<WalkReport, BuildError> {
        router::route_diffs(&mut self.registry, diffs);
        let report = walker::walk(&self.registry, &self.io, self.verbose)?;
        self.notifier.emit(&report.files);
        Ok(report)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cwd", &self.cwd)
            .field("output", &self.output)
            .field("pipelines", &self.registry.len())
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Configures one pipeline and registers it on the explicit completion
/// signal `seal()`.
pub struct PipelineBuilder<'a> {
    engine: &'a mut Engine,
    pipeline: Pipeline,
}

impl PipelineBuilder<'_> {
    /// Set the diagnostic tag (defaults to the pattern, or "rest").
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.pipeline.set_tag(tag);
        self
    }

    /// Append a transformer to the chain.
    pub fn pipe(mut self, transformer: Box<dyn Transformer>) -> Self {
        self.pipeline.push_transformer(transformer);
        self
    }

    /// Register the configured pipeline with the engine.
    pub fn seal(self) {
        self.engine.registry.register(self.pipeline);
    }
}
