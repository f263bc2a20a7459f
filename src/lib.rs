//! sift: pattern-routed file build pipelines.
//!
//! Files discovered under a working directory are routed by glob pattern
//! into ordered pipelines, each carrying a chain of transformers. A file
//! may belong to several pipelines at once; whatever nothing claims goes
//! to an optional catch-all. Builds run the pipelines strictly in
//! registration order and abort on the first failure. Watch mode turns
//! filesystem notifications into incremental diffs against the same
//! pipeline set.

pub mod cli;
pub mod config;
pub mod engine;
pub mod io;
pub mod transform;
pub mod watch;
