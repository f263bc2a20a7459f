//! Pipelines and their working sets.
//!
//! A pipeline is bound either to a glob pattern or to the catch-all rest
//! role. It owns a private working set of file records and an opaque
//! transform chain; the router mutates the working set, the walker runs
//! the chain over it.

use crate::engine::router::{Diff, DiffKind};
use crate::io::FileIo;
use crate::transform::{PipelineOutput, TransformError, Transformer};

/// Identity of a source file: its relative, slash-separated path.
///
/// Records are immutable and may be owned by several pipelines at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileRecord {
    filename: String,
}

impl FileRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self { filename: filename.into() }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl std::fmt::Display for FileRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.filename)
    }
}

/// Insertion-ordered set of file records, keyed by filename.
///
/// Adding a record whose filename is already present replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    records: Vec<FileRecord>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.records.iter().any(|r| r.filename == filename)
    }

    /// Insert a record, replacing any existing record with the same
    /// filename without changing its position.
    pub fn upsert(&mut self, record: FileRecord) {
        match self.records.iter_mut().find(|r| r.filename == record.filename) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Remove by filename. Returns whether a record was held.
    pub fn remove(&mut self, filename: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.filename != filename);
        self.records.len() != before
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }
}

impl FromIterator<FileRecord> for FileSet {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for record in iter {
            set.upsert(record);
        }
        set
    }
}

/// What a pipeline is bound to.
pub enum PipelineRole {
    /// Claims files whose path matches the glob pattern
    Patterned(glob::Pattern),
    /// Catch-all: receives whatever no patterned pipeline claimed
    Rest,
}

impl std::fmt::Debug for PipelineRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineRole::Patterned(p) => write!(f, "Patterned({})", p.as_str()),
            PipelineRole::Rest => write!(f, "Rest"),
        }
    }
}

/// A registered processing unit: role, working set, transform chain.
pub struct Pipeline {
    tag: String,
    role: PipelineRole,
    files: FileSet,
    chain: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Create a pattern-bound pipeline.
    pub fn patterned(tag: impl Into<String>, pattern: glob::Pattern) -> Self {
        Self {
            tag: tag.into(),
            role: PipelineRole::Patterned(pattern),
            files: FileSet::new(),
            chain: Vec::new(),
        }
    }

    /// Create a catch-all pipeline.
    pub fn rest(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), role: PipelineRole::Rest, files: FileSet::new(), chain: Vec::new() }
    }

    /// Diagnostic name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    pub fn role(&self) -> &PipelineRole {
        &self.role
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.role, PipelineRole::Rest)
    }

    /// Pattern test. Pure given a filename; always false for rest, whose
    /// membership is assigned by the router instead.
    pub fn matches(&self, filename: &str) -> bool {
        match &self.role {
            PipelineRole::Patterned(pattern) => pattern.matches(filename),
            PipelineRole::Rest => false,
        }
    }

    /// Bulk accept: claim the file into the working set if the pattern
    /// matches. Returns whether it was claimed.
    pub fn accept(&mut self, file: &FileRecord) -> bool {
        if self.matches(file.filename()) {
            self.files.upsert(file.clone());
            true
        } else {
            false
        }
    }

    /// Incremental accept: apply a single diff to the working set.
    ///
    /// With `force` the pattern test is bypassed; the router uses that for
    /// the rest pipeline, whose membership is whatever nothing else wants.
    /// Returns whether the diff was claimed.
    pub fn apply_diff(&mut self, diff: &Diff, force: bool) -> bool {
        if !force && !self.matches(&diff.filename) {
            return false;
        }
        match diff.kind {
            DiffKind::Add | DiffKind::Change => {
                self.files.upsert(FileRecord::new(diff.filename.clone()));
            }
            DiffKind::Remove => {
                self.files.remove(&diff.filename);
            }
        }
        true
    }

    /// Replace the working set wholesale (leftover transfer).
    pub fn replace_files(&mut self, files: FileSet) {
        self.files = files;
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    /// Append a stage to the transform chain.
    pub fn push_transformer(&mut self, transformer: Box<dyn Transformer>) {
        self.chain.push(transformer);
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// Run the transform chain over the current working set.
    ///
    /// Stages run in order, each fed the flattened output of the previous
    /// one. An empty chain passes the working set through untouched.
    pub fn run(&self, io: &FileIo) -> Result<PipelineOutput, TransformError> {
        if self.chain.is_empty() {
            return Ok(PipelineOutput::from_records(self.files.records()));
        }

        let mut current: Vec<FileRecord> = self.files.records().to_vec();
        let mut output = PipelineOutput::empty();
        for transformer in &self.chain {
            output = transformer.apply(&current, io)?;
            current = output.clone().flatten();
        }
        Ok(output)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("tag", &self.tag)
            .field("role", &self.role)
            .field("files", &self.files.len())
            .field("chain", &self.chain.len())
            .finish()
    }
}
