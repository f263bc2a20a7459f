//! Configuration: `sift.toml` schema, discovery, loading, and patching.

pub mod loader;
pub mod schema;

pub use loader::{
    apply_patch, find_config, find_config_from, load_config, resolve_path, ConfigError,
    ConfigPatch, CONFIG_FILE,
};
pub use schema::{
    PipelineConfig, ProjectConfig, SiftConfig, TransformerConfig, WatchConfig,
    DEFAULT_BINARY_RESOURCE,
};
