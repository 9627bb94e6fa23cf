//! Configuration error types.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a configuration file.
///
/// None of these are fatal: the resolver logs them and carries on as if the
/// offending file did not exist.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid (relaxed) JSON.
    #[error("Invalid JSON in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The file parsed, but its top level is not an object.
    #[error("Configuration in {} is not an object", path.display())]
    NotAnObject { path: PathBuf },

    /// An `extends` chain leads back to a file already in the chain.
    #[error("Circular extends at {}", path.display())]
    CircularExtends { path: PathBuf, chain: Vec<PathBuf> },

    /// An `extends` chain is longer than the allowed depth.
    #[error("Extends chain deeper than {max_depth} at {}", path.display())]
    ExtendsDepthExceeded { path: PathBuf, max_depth: usize },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::NotAnObject { path }
            | Self::CircularExtends { path, .. }
            | Self::ExtendsDepthExceeded { path, .. } => path,
        }
    }

    /// The one-line notice printed alongside diagnostics.
    pub fn notice(&self) -> String {
        format!("Could not parse JSON at: {}", self.path().display())
    }
}
