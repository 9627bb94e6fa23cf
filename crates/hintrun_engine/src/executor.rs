//! Lint engine abstraction.
//!
//! The engine is the black box that knows the lint rules. hintrun only
//! shapes the options and globals fed to it and the diagnostics read back.

use crate::{DiagnosticRecord, EngineError, Globals, Options};

/// What one engine invocation produced.
///
/// An engine can fail part-way and still have reported findings, so the
/// records are kept alongside the failure rather than replaced by it.
#[derive(Debug, Default)]
pub struct EngineOutput {
    /// Records in engine order. `None` marks a record the engine could not
    /// complete, e.g. after giving up on too many errors.
    pub records: Vec<Option<DiagnosticRecord>>,
    /// Set when the invocation failed.
    pub failure: Option<EngineError>,
}

impl EngineOutput {
    /// Output of a run that finished normally.
    pub fn completed(records: Vec<Option<DiagnosticRecord>>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// Output of a run that failed after producing `records`.
    pub fn failed(records: Vec<Option<DiagnosticRecord>>, failure: EngineError) -> Self {
        Self {
            records,
            failure: Some(failure),
        }
    }

    /// Returns whether the invocation failed.
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Trait for lint engines.
///
/// Implementations return their findings directly; nothing is shared between
/// invocations.
pub trait LintEngine {
    /// Lints `source` with the given options and predefined globals.
    fn lint(&mut self, source: &str, options: &Options, globals: &Globals) -> EngineOutput;
}

impl<E: LintEngine + ?Sized> LintEngine for &mut E {
    fn lint(&mut self, source: &str, options: &Options, globals: &Globals) -> EngineOutput {
        (**self).lint(source, options, globals)
    }
}

impl<E: LintEngine + ?Sized> LintEngine for Box<E> {
    fn lint(&mut self, source: &str, options: &Options, globals: &Globals) -> EngineOutput {
        (**self).lint(source, options, globals)
    }
}
