//! Watch mode: automatic incremental rebuilds on file changes.
//!
//! Monitors the working directory recursively with a debounced watcher,
//! normalizes raw notifications into diffs, and feeds each batch through
//! the engine's incremental path. Events under the output subtree and
//! dot-prefixed paths are ignored.

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::HashSet;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::config::WatchConfig;
use crate::engine::discovery::{is_hidden, list_files, relative_slash};
use crate::engine::{Diff, DiffKind, Engine};

/// Error during watch mode.
#[derive(Debug)]
pub enum WatchError {
    /// Failed to initialize the file watcher
    WatcherInit(notify::Error),
    /// Failed to add the watch path
    WatchPath(notify::Error),
    /// Channel receive error
    Channel(String),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::WatcherInit(e) => write!(f, "Failed to initialize file watcher: {}", e),
            WatchError::WatchPath(e) => write!(f, "Failed to watch path: {}", e),
            WatchError::Channel(msg) => write!(f, "Watch channel error: {}", msg),
        }
    }
}

impl std::error::Error for WatchError {}

/// Clear the terminal screen.
fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Format a duration for display.
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Current wall-clock time for logging, HH:MM:SS.
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400;
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

/// Reconstruct a diff from a debounced notification.
///
/// The debouncer reports only "something happened at this path"; the
/// command is recovered from path existence plus the set of filenames
/// routed so far.
fn classify(filename: String, exists: bool, known: &mut HashSet<String>) -> Option<Diff> {
    if !exists {
        if known.remove(&filename) {
            return Some(Diff::new(filename, DiffKind::Remove));
        }
        return None;
    }
    if known.contains(&filename) {
        Some(Diff::new(filename, DiffKind::Change))
    } else {
        known.insert(filename.clone());
        Some(Diff::new(filename, DiffKind::Add))
    }
}

/// Watch the engine's working directory and rebuild on changes.
///
/// Runs an initial full build, then blocks until interrupted. Build
/// failures are reported and watching continues.
pub fn watch_and_rebuild(engine: &mut Engine, config: &WatchConfig) -> Result<(), WatchError> {
    let cwd = engine.cwd().to_path_buf();
    let output = engine.output_name().to_string();

    let (tx, rx) = channel();
    let debounce = Duration::from_millis(config.debounce_ms);
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;
    debouncer.watcher().watch(&cwd, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    // Initial full build; the known set seeds incremental classification.
    if config.clear_screen {
        clear_screen();
    }
    println!("[{}] Building...", timestamp());
    match engine.build() {
        Ok(report) => println!(
            "[{}] Build complete ({}) - {} artifacts",
            timestamp(),
            format_duration(report.total_duration),
            report.files.len()
        ),
        Err(e) => eprintln!("[{}] Build failed: {}", timestamp(), e),
    }

    let mut known: HashSet<String> = list_files(&cwd, &output)
        .map(|files| files.into_iter().filter(|f| !is_hidden(f)).collect())
        .unwrap_or_default();

    println!("[{}] Watching {} for changes...", timestamp(), cwd.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let mut diffs = Vec::new();
                for event in events.iter().filter(|e| matches!(e.kind, DebouncedEventKind::Any)) {
                    let Some(rel) = relative_slash(&event.path, &cwd) else {
                        continue;
                    };
                    if is_hidden(&rel) || rel.split('/').next() == Some(output.as_str()) {
                        continue;
                    }
                    if event.path.exists() && !event.path.is_file() {
                        continue;
                    }
                    if let Some(diff) = classify(rel, event.path.exists(), &mut known) {
                        diffs.push(diff);
                    }
                }

                if diffs.is_empty() {
                    continue;
                }

                if config.clear_screen {
                    clear_screen();
                }
                for diff in &diffs {
                    println!("[{}] File {} has been {}d", timestamp(), diff.filename, diff.kind);
                }

                println!("[{}] Building...", timestamp());
                match engine.apply_diffs(&diffs) {
                    Ok(report) => println!(
                        "[{}] Build complete ({}) - {} artifacts",
                        timestamp(),
                        format_duration(report.total_duration),
                        report.files.len()
                    ),
                    Err(e) => eprintln!("[{}] Build failed: {}", timestamp(), e),
                }
                println!("[{}] Watching {} for changes...", timestamp(), cwd.display());
            }
            Ok(Err(error)) => {
                // Watcher hiccup, keep going.
                eprintln!("[{}] Watch error: {:?}", timestamp(), error);
            }
            Err(e) => {
                return Err(WatchError::Channel(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_classify_new_file_is_add() {
        let mut known = HashSet::new();
        let diff = classify("a.js".to_string(), true, &mut known).unwrap();
        assert_eq!(diff.kind, DiffKind::Add);
        assert!(known.contains("a.js"));
    }

    #[test]
    fn test_classify_known_file_is_change() {
        let mut known: HashSet<String> = ["a.js".to_string()].into();
        let diff = classify("a.js".to_string(), true, &mut known).unwrap();
        assert_eq!(diff.kind, DiffKind::Change);
    }

    #[test]
    fn test_classify_vanished_known_file_is_remove() {
        let mut known: HashSet<String> = ["a.js".to_string()].into();
        let diff = classify("a.js".to_string(), false, &mut known).unwrap();
        assert_eq!(diff.kind, DiffKind::Remove);
        assert!(known.is_empty());
    }

    #[test]
    fn test_classify_vanished_unknown_file_is_dropped() {
        let mut known = HashSet::new();
        assert!(classify("ghost.js".to_string(), false, &mut known).is_none());
    }
}
