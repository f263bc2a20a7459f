//! The `build` subcommand: configure an engine from `sift.toml` and run
//! it, once or in watch mode.

use std::env;
use std::path::PathBuf;

use crate::cli::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::{self, ConfigPatch, SiftConfig};
use crate::engine::Engine;
use crate::transform::TransformerRegistry;
use crate::watch;

pub struct BuildArgs {
    pub config: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub output: Option<String>,
    pub watch: bool,
    pub verbose: bool,
}

pub fn run_build(args: BuildArgs) -> u8 {
    // The project root anchors relative paths in the config; it is the
    // config file's directory, or the current directory without one.
    let config_path = match args.config {
        Some(ref path) => Some(path.clone()),
        None => config::find_config(),
    };
    let project_root = match project_root_for(config_path.as_deref()) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ERROR;
        }
    };

    let mut config = match config::load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_INVALID_ARGS;
        }
    };
    config::apply_patch(
        &mut config,
        &ConfigPatch { cwd: args.cwd, output: args.output, binary_resource: None },
    );

    let mut engine = Engine::new(&config, &project_root).with_verbose(args.verbose);
    if !engine.cwd().is_dir() {
        eprintln!("Error: working directory not found: {}", engine.cwd().display());
        return EXIT_INVALID_ARGS;
    }

    let transformers = TransformerRegistry::with_builtins();
    if let Err(e) = register_pipelines(&mut engine, &config, &transformers) {
        eprintln!("Error: {}", e);
        return EXIT_INVALID_ARGS;
    }

    engine.on_complete(|files| {
        println!("Build complete: {} artifacts", files.len());
    });

    if args.watch {
        match watch::watch_and_rebuild(&mut engine, &config.watch) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        }
    } else {
        match engine.build() {
            Ok(report) => {
                if !args.verbose {
                    println!("{}", report.summary());
                }
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        }
    }
}

fn project_root_for(config_path: Option<&std::path::Path>) -> std::io::Result<PathBuf> {
    match config_path.and_then(|p| p.parent()) {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => env::current_dir(),
    }
}

/// Register one pipeline per `[[pipelines]]` entry, in declaration order.
fn register_pipelines(
    engine: &mut Engine,
    config: &SiftConfig,
    transformers: &TransformerRegistry,
) -> Result<(), String> {
    for declared in &config.pipelines {
        let mut builder = if declared.rest {
            engine.rest()
        } else {
            // validate() guarantees a pattern on non-rest entries.
            let pattern = declared.pattern.as_deref().unwrap_or_default();
            engine.pick(pattern).map_err(|e| e.to_string())?
        };

        if let Some(ref tag) = declared.tag {
            builder = builder.tag(tag.clone());
        }

        for stage in &declared.transformers {
            let options = match stage.options {
                Some(ref value) => Some(
                    serde_json::to_value(value)
                        .map_err(|e| format!("invalid options for '{}': {}", stage.name, e))?,
                ),
                None => None,
            };
            let transformer = transformers
                .build(&stage.name, options.as_ref())
                .map_err(|e| e.to_string())?;
            builder = builder.pipe(transformer);
        }

        builder.seal();
    }
    Ok(())
}
