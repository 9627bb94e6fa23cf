//! CLI argument definitions

use std::path::{Path, PathBuf};

use clap::Parser;

/// hintrun - JSHint with cascading configuration, for editors
#[derive(Parser)]
#[command(name = "hintrun")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File holding the source to lint
    pub temp_path: PathBuf,

    /// Original location of the source, used to find its configuration
    /// (defaults to TEMP_PATH)
    pub source_path: Option<PathBuf>,

    /// Directory holding the tool-level default .jshintrc
    /// (defaults to the directory of this executable)
    #[arg(long, env = "HINTRUN_PLUGIN_DIR", value_name = "DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Configuration file path (skips the directory cascade)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lint engine program
    #[arg(long, env = "HINTRUN_ENGINE", default_value = "hintrun-engine")]
    pub engine: String,

    /// Argument passed to the lint engine (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The path that seeds the configuration cascade.
    pub fn source_path(&self) -> &Path {
        self.source_path.as_deref().unwrap_or(&self.temp_path)
    }

    /// The tool installation directory, if it can be determined.
    pub fn plugin_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.plugin_dir {
            return Some(dir.clone());
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    }
}
