//! File I/O facade rooted at the project working directory.
//!
//! All reads resolve against the working directory and all writes land
//! under the output directory, with parent directories created on demand.
//! Files whose extension is in the configured binary list are read as raw
//! bytes; everything else is read as UTF-8 text.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error from a facade read or write.
#[derive(Debug, Error)]
pub enum IoError {
    /// Underlying filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A text read hit non-UTF-8 bytes
    #[error("file '{name}' is not valid UTF-8 (add its extension to binary_resource?)")]
    NonUtf8 { name: String },
}

/// Content read from or written through the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Binary(Vec<u8>),
}

impl Content {
    /// View the content as bytes regardless of variant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(s) => s.as_bytes(),
            Content::Binary(b) => b,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Content::Binary(b)
    }
}

/// Immutable file access handle shared by every pipeline run.
///
/// Constructed once from the configuration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FileIo {
    cwd: PathBuf,
    output: String,
    binary_exts: HashSet<String>,
}

impl FileIo {
    /// Create a facade rooted at `cwd`, writing under `output` (a directory
    /// name relative to `cwd`). `binary_resource` is a comma-separated
    /// extension list.
    pub fn new(cwd: PathBuf, output: &str, binary_resource: &str) -> Self {
        let binary_exts = binary_resource
            .split(',')
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { cwd, output: output.to_string(), binary_exts }
    }

    /// The working directory this facade is rooted at.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The output directory name.
    pub fn output_name(&self) -> &str {
        &self.output
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.cwd.join(&self.output)
    }

    /// Resolve a relative filename to an absolute path under the working
    /// directory.
    pub fn locate(&self, name: &str) -> PathBuf {
        self.cwd.join(name)
    }

    /// Whether a filename should be treated as binary, by extension.
    pub fn is_binary(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.binary_exts.contains(&e.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Read a file relative to the working directory.
    ///
    /// Binary files come back as raw bytes, everything else as UTF-8 text.
    pub fn read(&self, name: &str) -> Result<Content, IoError> {
        let path = self.locate(name);
        let bytes = fs::read(&path)?;
        if self.is_binary(name) {
            Ok(Content::Binary(bytes))
        } else {
            String::from_utf8(bytes)
                .map(Content::Text)
                .map_err(|_| IoError::NonUtf8 { name: name.to_string() })
        }
    }

    /// Write a file under the output directory, creating parent
    /// directories as needed.
    pub fn write(&self, name: &str, content: &Content) -> Result<(), IoError> {
        let path = self.output_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn facade(temp: &TempDir) -> FileIo {
        FileIo::new(temp.path().to_path_buf(), "output", "png,jpg,woff2")
    }

    #[test]
    fn test_is_binary_by_extension() {
        let temp = TempDir::new().unwrap();
        let io = facade(&temp);

        assert!(io.is_binary("logo.png"));
        assert!(io.is_binary("fonts/main.WOFF2"));
        assert!(!io.is_binary("app.js"));
        assert!(!io.is_binary("README"));
    }

    #[test]
    fn test_binary_list_tolerates_spacing_and_dots() {
        let temp = TempDir::new().unwrap();
        let io = FileIo::new(temp.path().to_path_buf(), "output", " .png , jpg ,");

        assert!(io.is_binary("a.png"));
        assert!(io.is_binary("a.jpg"));
        assert!(!io.is_binary("a.gif"));
    }

    #[test]
    fn test_locate_joins_cwd() {
        let temp = TempDir::new().unwrap();
        let io = facade(&temp);

        assert_eq!(io.locate("src/app.js"), temp.path().join("src/app.js"));
    }

    #[test]
    fn test_read_text() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "hello").unwrap();

        let io = facade(&temp);
        assert_eq!(io.read("a.txt").unwrap(), Content::Text("hello".to_string()));
    }

    #[test]
    fn test_read_binary() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.png"), [0xFF, 0xD8, 0x00]).unwrap();

        let io = facade(&temp);
        assert_eq!(io.read("a.png").unwrap(), Content::Binary(vec![0xFF, 0xD8, 0x00]));
    }

    #[test]
    fn test_read_non_utf8_text_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), [0xFF, 0xFE]).unwrap();

        let io = facade(&temp);
        assert!(matches!(io.read("a.txt"), Err(IoError::NonUtf8 { .. })));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let io = facade(&temp);

        assert!(matches!(io.read("nope.txt"), Err(IoError::Io(_))));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let io = facade(&temp);

        io.write("deep/nested/a.txt", &Content::from("x")).unwrap();

        let written = temp.path().join("output/deep/nested/a.txt");
        assert_eq!(std::fs::read_to_string(written).unwrap(), "x");
    }

    #[test]
    fn test_write_lands_under_output_root() {
        let temp = TempDir::new().unwrap();
        let io = facade(&temp);

        io.write("a.txt", &Content::from("y")).unwrap();

        assert!(temp.path().join("output/a.txt").exists());
        assert!(!temp.path().join("a.txt").exists());
    }

    #[test]
    fn test_content_as_bytes() {
        assert_eq!(Content::from("ab").as_bytes(), b"ab");
        assert_eq!(Content::Binary(vec![1, 2]).as_bytes(), &[1, 2]);
        assert!(Content::from("").is_empty());
        assert_eq!(Content::from("abc").len(), 3);
    }
}
