//! Lint command implementation

use std::fs;
use std::io::{self, Write};

use miette::{IntoDiagnostic, Result};
use tracing::debug;

use hintrun_core::{ConfigResolver, DiagnosticPipeline, Resolution};
use hintrun_engine::CommandEngine;

use crate::cli::Cli;
use crate::output::write_preamble;

pub fn run_lint(cli: &Cli) -> Result<()> {
    let resolution = resolve_config(cli);

    // Nothing at all is printed when the source cannot be read.
    let source = match fs::read_to_string(&cli.temp_path) {
        Ok(source) => source,
        Err(e) => {
            debug!("Failed to read {}: {}", cli.temp_path.display(), e);
            return Ok(());
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    write_preamble(&mut out, &resolution)?;

    let engine = CommandEngine::new(&cli.engine).with_args(&cli.engine_args);
    let mut pipeline = DiagnosticPipeline::new(engine, &resolution.configuration);
    pipeline.run_to(&source, &mut out).into_diagnostic()?;

    out.flush().into_diagnostic()
}

fn resolve_config(cli: &Cli) -> Resolution {
    let mut resolver = match cli.plugin_dir() {
        Some(dir) => ConfigResolver::new(dir),
        None => ConfigResolver::without_plugin_dir(),
    };
    if let Some(path) = &cli.config {
        resolver = resolver.with_config_file(path);
    }

    let resolution = resolver.resolve(cli.source_path());
    if resolution.applied.is_empty() {
        debug!("No config file found, using engine defaults");
    }
    resolution
}
