//! # hintrun_core
//!
//! Core of hintrun.
//!
//! This crate provides:
//! - `ConfigResolver`, which finds the nearest JSHint configuration for a
//!   source file and folds it into one effective `Configuration`
//! - `DiagnosticPipeline`, which lints the lintable regions of a document and
//!   renders ordered `line :: character :: message` lines
//!
//! ## Example
//!
//! ```rust,ignore
//! use hintrun_core::{ConfigResolver, DiagnosticPipeline};
//! use hintrun_engine::CommandEngine;
//!
//! let resolution = ConfigResolver::new("/opt/hintrun").resolve("src/app.js".as_ref());
//! let mut pipeline = DiagnosticPipeline::new(CommandEngine::new("hintrun-engine"), &resolution.configuration);
//! for line in pipeline.run(&std::fs::read_to_string("src/app.js")?) {
//!     println!("{}", line);
//! }
//! ```

mod config;
mod error;
mod extract;
mod pipeline;
mod resolver;

pub use config::{
    Configuration, EXTENDS_KEY, Fragment, GLOBALS_KEYS, JSHINTRC, MANIFEST_KEY, PACKAGE_JSON,
};
pub use error::ConfigError;
pub use extract::{Region, extract_regions, is_markup};
pub use pipeline::{DiagnosticPipeline, format_record, render_message, sort_records};
pub use resolver::{ConfigResolver, MAX_EXTENDS_DEPTH, Resolution};

#[cfg(test)]
pub mod test_utils;

pub use hintrun_engine::{DiagnosticRecord, Globals, LintEngine, OptionValue, Options};
