//! The `init` subcommand: write a starter `sift.toml`.

use std::fs;
use std::path::Path;

use crate::cli::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::CONFIG_FILE;

const TEMPLATE: &str = r#"# sift build configuration

[project]
# Directory to build, relative to this file.
cwd = "."
# Output directory name, created under cwd.
output = "output"

# Pipelines claim files in declaration order. A file may belong to
# several pipelines at once; anything unclaimed goes to the rest
# pipeline, if one is declared.

[[pipelines]]
tag = "scripts"
pattern = "**/*.js"
transformers = [{ name = "copy" }]

[[pipelines]]
tag = "assets"
rest = true
transformers = [{ name = "copy" }]

[watch]
debounce_ms = 100
clear_screen = false
"#;

pub fn run_init(force: bool) -> u8 {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        eprintln!("Error: {} already exists (use --force to overwrite)", CONFIG_FILE);
        return EXIT_INVALID_ARGS;
    }

    match fs::write(path, TEMPLATE) {
        Ok(()) => {
            println!("Wrote {}", CONFIG_FILE);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: failed to write {}: {}", CONFIG_FILE, e);
            EXIT_ERROR
        }
    }
}
