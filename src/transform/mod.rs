//! Pluggable file transformers.
//!
//! A transformer takes a pipeline's current working set, does whatever it
//! does (copy, minify, drop, ...), and reports the artifacts it produced.
//! Transformer output may be arbitrarily nested; the walker flattens it
//! when aggregating.

pub mod builtin;
pub mod registry;

pub use builtin::{CopyTransformer, IgnoreTransformer};
pub use registry::{TransformerFactory, TransformerRegistry};

use crate::engine::pipeline::FileRecord;
use crate::io::{FileIo, IoError};
use thiserror::Error;

/// Error from a transformer run. Fatal to the walk that triggered it.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Read/write failure through the file facade
    #[error(transparent)]
    Io(#[from] IoError),
    /// Transformer-specific failure, opaque to the orchestrator
    #[error("{0}")]
    Failed(String),
}

/// Artifacts produced by one transformer or pipeline run.
///
/// A single run may produce one file, or a group of sub-results which may
/// themselves be groups. Consumers flatten unconditionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutput {
    /// A single produced artifact
    File(FileRecord),
    /// A collection of sub-results, possibly nested
    Group(Vec<PipelineOutput>),
}

impl PipelineOutput {
    /// An empty group.
    pub fn empty() -> Self {
        PipelineOutput::Group(Vec::new())
    }

    /// Wrap a slice of records as a flat group.
    pub fn from_records(records: &[FileRecord]) -> Self {
        PipelineOutput::Group(records.iter().cloned().map(PipelineOutput::File).collect())
    }

    /// Collapse all nesting levels into a linear, order-preserving sequence.
    pub fn flatten(self) -> Vec<FileRecord> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<FileRecord>) {
        match self {
            PipelineOutput::File(record) => out.push(record),
            PipelineOutput::Group(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

/// A single stage in a pipeline's transform chain.
///
/// Implementations must be deterministic for reproducible builds, but the
/// orchestrator does not enforce that.
pub trait Transformer {
    /// Diagnostic name.
    fn name(&self) -> &str;

    /// Transform the given records, reading and writing through the facade.
    fn apply(&self, files: &[FileRecord], io: &FileIo) -> Result<PipelineOutput, TransformError>;
}

impl std::fmt::Debug for dyn Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str) -> FileRecord {
        FileRecord::new(name)
    }

    #[test]
    fn test_flatten_single_file() {
        let out = PipelineOutput::File(rec("a.js"));
        assert_eq!(out.flatten(), vec![rec("a.js")]);
    }

    #[test]
    fn test_flatten_deeply_nested_preserves_order() {
        let out = PipelineOutput::Group(vec![
            PipelineOutput::File(rec("a.js")),
            PipelineOutput::Group(vec![
                PipelineOutput::Group(vec![PipelineOutput::File(rec("b.js"))]),
                PipelineOutput::File(rec("c.js")),
            ]),
            PipelineOutput::File(rec("d.js")),
        ]);

        assert_eq!(out.flatten(), vec![rec("a.js"), rec("b.js"), rec("c.js"), rec("d.js")]);
    }

    #[test]
    fn test_flatten_empty_groups() {
        let out = PipelineOutput::Group(vec![
            PipelineOutput::empty(),
            PipelineOutput::Group(vec![PipelineOutput::empty()]),
        ]);
        assert!(out.flatten().is_empty());
    }

    #[test]
    fn test_from_records() {
        let records = [rec("a"), rec("b")];
        assert_eq!(PipelineOutput::from_records(&records).flatten(), records.to_vec());
    }
}
