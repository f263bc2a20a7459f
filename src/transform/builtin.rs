//! Built-in transformers registered at startup.

use super::{PipelineOutput, TransformError, Transformer};
use crate::engine::pipeline::FileRecord;
use crate::io::FileIo;

/// Copies every file in the working set to the output directory, byte for
/// byte, preserving its relative path.
#[derive(Debug, Default)]
pub struct CopyTransformer;

impl CopyTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for CopyTransformer {
    fn name(&self) -> &str {
        "copy"
    }

    fn apply(&self, files: &[FileRecord], io: &FileIo) -> Result<PipelineOutput, TransformError> {
        let mut produced = Vec::with_capacity(files.len());
        for file in files {
            let content = io.read(file.filename())?;
            io.write(file.filename(), &content)?;
            produced.push(PipelineOutput::File(file.clone()));
        }
        Ok(PipelineOutput::Group(produced))
    }
}

/// Swallows its input and produces nothing. Useful as a rest pipeline's
/// chain for files that should not reach the output directory.
#[derive(Debug, Default)]
pub struct IgnoreTransformer;

impl IgnoreTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for IgnoreTransformer {
    fn name(&self) -> &str {
        "ignore"
    }

    fn apply(&self, _files: &[FileRecord], _io: &FileIo) -> Result<PipelineOutput, TransformError> {
        Ok(PipelineOutput::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_writes_under_output() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("src/a.js"), "let a = 1;").unwrap();

        let io = FileIo::new(temp.path().to_path_buf(), "output", "png");
        let files = [FileRecord::new("src/a.js")];

        let out = CopyTransformer::new().apply(&files, &io).unwrap();

        assert_eq!(out.flatten(), files.to_vec());
        let copied = temp.path().join("output/src/a.js");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "let a = 1;");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let io = FileIo::new(temp.path().to_path_buf(), "output", "");
        let files = [FileRecord::new("gone.js")];

        assert!(matches!(
            CopyTransformer::new().apply(&files, &io),
            Err(TransformError::Io(_))
        ));
    }

    #[test]
    fn test_ignore_produces_nothing() {
        let temp = TempDir::new().unwrap();
        let io = FileIo::new(temp.path().to_path_buf(), "output", "");
        let files = [FileRecord::new("a.log"), FileRecord::new("b.log")];

        let out = IgnoreTransformer::new().apply(&files, &io).unwrap();
        assert!(out.flatten().is_empty());
    }
}
