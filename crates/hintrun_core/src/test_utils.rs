use std::collections::VecDeque;

use hintrun_engine::{EngineOutput, Globals, LintEngine, Options};

/// One recorded engine invocation.
#[derive(Debug)]
pub struct LintCall {
    pub source: String,
    pub options: Options,
    pub globals: Globals,
}

/// An engine that replays queued outputs and records what it was asked.
///
/// Once the queue is empty every call reports no findings.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    responses: VecDeque<EngineOutput>,
    pub calls: Vec<LintCall>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the output for the next call.
    pub fn respond(mut self, output: EngineOutput) -> Self {
        self.responses.push_back(output);
        self
    }
}

impl LintEngine for ScriptedEngine {
    fn lint(&mut self, source: &str, options: &Options, globals: &Globals) -> EngineOutput {
        self.calls.push(LintCall {
            source: source.to_string(),
            options: options.clone(),
            globals: globals.clone(),
        });
        self.responses.pop_front().unwrap_or_default()
    }
}
