//! Configuration schema for `sift.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// Extensions treated as binary resources by default (read/written as raw
/// bytes instead of UTF-8 text).
pub const DEFAULT_BINARY_RESOURCE: &str = "webp,png,jpg,jpeg,gif,bmp,tiff,ico,cur,\
woff,woff2,ttf,eot,otf,swf,\
zip,gz,tgz,bz2,tbz2,xz,txz,7z,rar,tar,jar,iso,img,dmg,apk,ipa,exe,\
pdf,psd,doc,docx,xls,xlsx,ppt,pptx,rtf,csv,mobi,\
mp3,mp4,m4a,wma,ogg,wav,aiff,midi,aac,flac,ape,\
avi,mov,wmv,3gp,mkv,flv,f4v,rmvb,webm,vob";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SiftConfig {
    /// Project directories and binary detection
    #[serde(default)]
    pub project: ProjectConfig,
    /// Ordered pipeline declarations
    #[serde(default)]
    pub pipelines: Vec<PipelineConfig>,
    /// Watch mode behavior
    #[serde(default)]
    pub watch: WatchConfig,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Working directory, resolved against the config file's directory
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,
    /// Output directory name, created under cwd on demand
    #[serde(default = "default_output")]
    pub output: String,
    /// Comma-separated extension list for binary detection
    #[serde(default = "default_binary_resource")]
    pub binary_resource: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            cwd: default_cwd(),
            output: default_output(),
            binary_resource: default_binary_resource(),
        }
    }
}

fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

fn default_output() -> String {
    "output".to_string()
}

fn default_binary_resource() -> String {
    DEFAULT_BINARY_RESOURCE.to_string()
}

/// One `[[pipelines]]` entry. Declaration order is registration order.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Diagnostic tag; defaults to the pattern (or "rest")
    pub tag: Option<String>,
    /// Glob pattern; omit for the rest pipeline
    pub pattern: Option<String>,
    /// Catch-all role
    #[serde(default)]
    pub rest: bool,
    /// Transform chain, applied in order
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
}

/// One stage in a declared transform chain.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformerConfig {
    /// Registry name (normalized to lowerCamelCase at lookup)
    pub name: String,
    /// Options value handed to the transformer factory
    pub options: Option<toml::Value>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    /// Debounce window for change notifications, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Clear the terminal before each rebuild
    #[serde(default)]
    pub clear_screen: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms(), clear_screen: false }
    }
}

fn default_debounce_ms() -> u64 {
    100
}

impl SiftConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.project.output.trim().is_empty() {
            errors.push("project.output must not be empty".to_string());
        }
        if self.project.output.contains('/') || self.project.output.contains('\\') {
            errors.push("project.output must be a plain directory name".to_string());
        }
        if self.watch.debounce_ms == 0 {
            errors.push("watch.debounce_ms must be greater than zero".to_string());
        }

        for (index, pipeline) in self.pipelines.iter().enumerate() {
            match (&pipeline.pattern, pipeline.rest) {
                (Some(p), false) if p.trim().is_empty() => {
                    errors.push(format!("pipelines[{}]: pattern must not be empty", index));
                }
                (Some(_), true) => {
                    errors.push(format!(
                        "pipelines[{}]: declare either a pattern or rest, not both",
                        index
                    ));
                }
                (None, false) => {
                    errors.push(format!("pipelines[{}]: needs a pattern, or rest = true", index));
                }
                _ => {}
            }
            for (t_index, transformer) in pipeline.transformers.iter().enumerate() {
                if transformer.name.trim().is_empty() {
                    errors.push(format!(
                        "pipelines[{}].transformers[{}]: name must not be empty",
                        index, t_index
                    ));
                }
            }
        }

        errors
    }
}
