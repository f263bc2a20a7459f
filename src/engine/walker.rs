//! Sequential pipeline walker.
//!
//! Executes the registered pipelines strictly in registration order,
//! aggregates and flattens their outputs, and aborts the whole walk on
//! the first failure. Timing is collected for diagnostics only.

use crate::engine::discovery::DiscoveryError;
use crate::engine::pipeline::FileRecord;
use crate::engine::registry::PipelineRegistry;
use crate::io::FileIo;
use crate::transform::TransformError;
use std::time::{Duration, Instant};

/// Error that aborts a build.
#[derive(Debug)]
pub enum BuildError {
    /// File discovery failed
    Discovery(DiscoveryError),
    /// A pipeline's run failed; nothing after it ran
    Transform { tag: String, source: TransformError },
    /// IO error outside any pipeline
    Io(std::io::Error),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Discovery(e) => write!(f, "Discovery error: {}", e),
            BuildError::Transform { tag, source } => {
                write!(f, "Pipeline '{}' failed: {}", tag, source)
            }
            BuildError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<DiscoveryError> for BuildError {
    fn from(e: DiscoveryError) -> Self {
        BuildError::Discovery(e)
    }
}

impl From<std::io::Error> for BuildError {
    fn from(e: std::io::Error) -> Self {
        BuildError::Io(e)
    }
}

/// Outcome of one complete walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Flattened, order-preserving concatenation of every pipeline's output
    pub files: Vec<FileRecord>,
    /// Per-pipeline run durations, in execution order
    pub timings: Vec<(String, Duration)>,
    /// Wall time for the whole walk
    pub total_duration: Duration,
}

impl WalkReport {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "Complete in {}ms: {} artifacts from {} pipelines",
            self.total_duration.as_millis(),
            self.files.len(),
            self.timings.len()
        )
    }
}

/// Run every registered pipeline, one after another.
///
/// Pipeline i+1 starts only after pipeline i settled. On failure the walk
/// stops immediately and the error carries the failing pipeline's tag.
pub fn walk(
    registry: &PipelineRegistry,
    io: &FileIo,
    verbose: bool,
) -> Result<WalkReport, BuildError> {
    let start = Instant::now();
    let total = registry.len();

    let mut report = WalkReport::default();
    for (index, pipeline) in registry.iter().enumerate() {
        if verbose {
            println!("{}...start[{}/{}]", pipeline.tag(), index + 1, total);
        }

        let pipeline_start = Instant::now();
        let output = pipeline.run(io).map_err(|source| BuildError::Transform {
            tag: pipeline.tag().to_string(),
            source,
        })?;
        let elapsed = pipeline_start.elapsed();

        if verbose {
            println!("{}...complete in {}ms", pipeline.tag(), elapsed.as_millis());
        }

        report.timings.push((pipeline.tag().to_string(), elapsed));
        report.files.extend(output.flatten());
    }

    report.total_duration = start.elapsed();
    if verbose {
        println!("{}", report.summary());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::Pipeline;
    use crate::transform::{PipelineOutput, Transformer};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Emit(Vec<&'static str>);

    impl Transformer for Emit {
        fn name(&self) -> &str {
            "emit"
        }
        fn apply(
            &self,
            _files: &[FileRecord],
            _io: &FileIo,
        ) -> Result<PipelineOutput, TransformError> {
            // Nested on purpose: the walker must flatten it away.
            Ok(PipelineOutput::Group(vec![PipelineOutput::Group(
                self.0.iter().map(|n| PipelineOutput::File(FileRecord::new(*n))).collect(),
            )]))
        }
    }

    struct Fail;

    impl Transformer for Fail {
        fn name(&self) -> &str {
            "fail"
        }
        fn apply(
            &self,
            _files: &[FileRecord],
            _io: &FileIo,
        ) -> Result<PipelineOutput, TransformError> {
            Err(TransformError::Failed("boom".into()))
        }
    }

    struct Record(Rc<RefCell<Vec<String>>>, &'static str);

    impl Transformer for Record {
        fn name(&self) -> &str {
            "record"
        }
        fn apply(
            &self,
            _files: &[FileRecord],
            _io: &FileIo,
        ) -> Result<PipelineOutput, TransformError> {
            self.0.borrow_mut().push(self.1.to_string());
            Ok(PipelineOutput::empty())
        }
    }

    fn io(temp: &TempDir) -> FileIo {
        FileIo::new(temp.path().to_path_buf(), "output", "")
    }

    fn with_chain(tag: &str, t: Box<dyn Transformer>) -> Pipeline {
        let mut p = Pipeline::patterned(tag, glob::Pattern::new("*").unwrap());
        p.push_transformer(t);
        p
    }

    #[test]
    fn test_walk_flattens_in_registration_order() {
        let temp = TempDir::new().unwrap();
        let mut registry = PipelineRegistry::new();
        registry.register(with_chain("one", Box::new(Emit(vec!["a", "b"]))));
        registry.register(with_chain("two", Box::new(Emit(vec!["c"]))));

        let report = walk(&registry, &io(&temp), false).unwrap();

        let names: Vec<_> = report.files.iter().map(|r| r.filename().to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(report.timings.len(), 2);
        assert_eq!(report.timings[0].0, "one");
    }

    #[test]
    fn test_walk_aborts_on_first_failure() {
        let temp = TempDir::new().unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut registry = PipelineRegistry::new();
        registry.register(with_chain("s1", Box::new(Record(order.clone(), "s1"))));
        registry.register(with_chain("s2", Box::new(Fail)));
        registry.register(with_chain("s3", Box::new(Record(order.clone(), "s3"))));

        let err = walk(&registry, &io(&temp), false).unwrap_err();

        assert!(matches!(&err, BuildError::Transform { tag, .. } if tag == "s2"));
        assert_eq!(*order.borrow(), vec!["s1".to_string()]);
    }

    #[test]
    fn test_walk_empty_registry() {
        let temp = TempDir::new().unwrap();
        let registry = PipelineRegistry::new();

        let report = walk(&registry, &io(&temp), false).unwrap();
        assert!(report.files.is_empty());
        assert!(report.timings.is_empty());
    }

    #[test]
    fn test_transform_error_message_carries_tag() {
        let temp = TempDir::new().unwrap();
        let mut registry = PipelineRegistry::new();
        registry.register(with_chain("styles", Box::new(Fail)));

        let err = walk(&registry, &io(&temp), false).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("styles"));
        assert!(message.contains("boom"));
    }
}
