//! File routing: bulk classification of a discovered tree and incremental
//! classification of single change notifications.

use crate::engine::pipeline::{FileRecord, FileSet};
use crate::engine::registry::PipelineRegistry;

/// What happened to a file, per the watch subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Add,
    Change,
    Remove,
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffKind::Add => write!(f, "add"),
            DiffKind::Change => write!(f, "change"),
            DiffKind::Remove => write!(f, "remove"),
        }
    }
}

/// A normalized filesystem-change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub filename: String,
    pub kind: DiffKind,
}

impl Diff {
    pub fn new(filename: impl Into<String>, kind: DiffKind) -> Self {
        Self { filename: filename.into(), kind }
    }
}

/// Bulk routing pass over a freshly discovered file list.
///
/// Every working set is rebuilt from scratch: each file is offered to
/// every patterned pipeline in registration order (a file may be claimed
/// by any number of them), unclaimed files collect in the leftover set,
/// and the leftovers are transferred wholesale to the rest pipeline if
/// one is designated.
pub fn group_all(registry: &mut PipelineRegistry, filenames: &[String]) {
    for pipeline in registry.iter_mut() {
        pipeline.clear_files();
    }

    let mut leftovers = FileSet::new();
    for filename in filenames {
        let file = FileRecord::new(filename.clone());
        let mut claimed = false;
        for pipeline in registry.iter_mut() {
            if pipeline.accept(&file) {
                claimed = true;
            }
        }
        if !claimed {
            leftovers.upsert(file);
        }
    }

    if let Some(rest) = registry.rest_pipeline_mut() {
        rest.replace_files(leftovers);
    }
}

/// Route a single diff through the registry.
///
/// Every pipeline gets to claim it in registration order. If none did and
/// a rest pipeline is designated, the diff is applied there
/// unconditionally; with no rest pipeline it is dropped silently.
pub fn route_diff(registry: &mut PipelineRegistry, diff: &Diff) {
    let mut claimed = false;
    for pipeline in registry.iter_mut() {
        if pipeline.apply_diff(diff, false) {
            claimed = true;
        }
    }

    if !claimed {
        if let Some(rest) = registry.rest_pipeline_mut() {
            rest.apply_diff(diff, true);
        }
    }
}

/// Route a batch of diffs strictly in the order received, each fully
/// classified before the next is considered.
pub fn route_diffs(registry: &mut PipelineRegistry, diffs: &[Diff]) {
    for diff in diffs {
        route_diff(registry, diff);
    }
}
