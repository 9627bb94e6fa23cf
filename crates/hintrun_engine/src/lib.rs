//! # hintrun_engine
//!
//! The lint engine capability consumed by hintrun.
//!
//! This crate provides:
//! - Option and global value types fed to the engine
//! - `DiagnosticRecord`, one raw finding reported by the engine
//! - The `LintEngine` trait
//! - `CommandEngine`, an engine backed by an external process

mod command;
mod diagnostic;
mod error;
mod executor;
mod options;

pub use command::CommandEngine;
pub use diagnostic::DiagnosticRecord;
pub use error::EngineError;
pub use executor::{EngineOutput, LintEngine};
pub use options::{Globals, OptionValue, Options, global_flag};
