//! Lint engine backed by an external process.
//!
//! The process receives one JSON request on stdin:
//!
//! ```json
//! { "source": "var x = y", "options": { "undef": true }, "globals": { "$": false } }
//! ```
//!
//! and answers on stdout with either a JSON array of records (`null` entries
//! allowed) or an object `{ "errors": [...], "failure": "..." }`.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{DiagnosticRecord, EngineError, EngineOutput, Globals, LintEngine, Options};

#[derive(Serialize)]
struct LintRequest<'a> {
    source: &'a str,
    options: &'a Options,
    globals: &'a Globals,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LintResponse {
    Records(Vec<Option<DiagnosticRecord>>),
    Report {
        #[serde(default)]
        errors: Vec<Option<DiagnosticRecord>>,
        #[serde(default)]
        failure: Option<String>,
    },
}

/// Runs an external program once per lint invocation.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandEngine {
    /// Creates an engine that runs `program`.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    /// Appends arguments passed to the program on every invocation.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    fn run(&self, payload: &[u8]) -> EngineOutput {
        debug!("Spawning lint engine {}", self.program_name());

        let mut child = match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(source) => {
                return EngineOutput::failed(
                    Vec::new(),
                    EngineError::Spawn {
                        program: self.program_name(),
                        source,
                    },
                );
            }
        };

        // stdin is fed on its own thread so an engine that answers before
        // draining its input cannot block on a full pipe. The engine may also
        // exit before reading everything; its stdout still counts.
        let stdin = child.stdin.take();
        let (output, write_result) = thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(payload)));
            let output = child.wait_with_output();
            let write_result = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, write_result)
        });

        let output = match output {
            Ok(output) => output,
            Err(e) => return EngineOutput::failed(Vec::new(), e.into()),
        };

        let (records, mut failure) = parse_response(&output.stdout);

        if failure.is_none() && !output.status.success() {
            failure = Some(EngineError::Exit(output.status.to_string()));
        }
        if failure.is_none()
            && let Err(e) = write_result
        {
            failure = Some(e.into());
        }

        match failure {
            Some(failure) => EngineOutput::failed(records, failure),
            None => EngineOutput::completed(records),
        }
    }
}

fn parse_response(stdout: &[u8]) -> (Vec<Option<DiagnosticRecord>>, Option<EngineError>) {
    let text = match std::str::from_utf8(stdout) {
        Ok(text) => text,
        Err(e) => return (Vec::new(), Some(EngineError::protocol(e.to_string()))),
    };

    if text.trim().is_empty() {
        return (Vec::new(), None);
    }

    match serde_json::from_str::<LintResponse>(text) {
        Ok(LintResponse::Records(records)) => (records, None),
        Ok(LintResponse::Report { errors, failure }) => {
            (errors, failure.map(EngineError::aborted))
        }
        Err(e) => (Vec::new(), Some(EngineError::protocol(e.to_string()))),
    }
}

impl LintEngine for CommandEngine {
    fn lint(&mut self, source: &str, options: &Options, globals: &Globals) -> EngineOutput {
        let request = LintRequest {
            source,
            options,
            globals,
        };
        match serde_json::to_vec(&request) {
            Ok(payload) => self.run(&payload),
            Err(e) => EngineOutput::failed(Vec::new(), e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_record_array() {
        let (records, failure) =
            parse_response(br#"[{"line": 1, "character": 5, "reason": "x"}, null]"#);
        assert!(failure.is_none());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().character, Some(5));
    }

    #[test]
    fn test_parse_report_with_failure() {
        let (records, failure) = parse_response(
            br#"{"errors": [{"line": 2, "character": 1, "reason": "x"}], "failure": "boom"}"#,
        );
        assert_eq!(records.len(), 1);
        assert!(matches!(failure, Some(EngineError::Aborted(ref m)) if m == "boom"));
    }

    #[test]
    fn test_parse_empty_output() {
        let (records, failure) = parse_response(b"  \n");
        assert!(records.is_empty());
        assert!(failure.is_none());
    }

    #[test]
    fn test_parse_garbage() {
        let (records, failure) = parse_response(b"Segmentation fault");
        assert!(records.is_empty());
        assert!(matches!(failure, Some(EngineError::Protocol(_))));
    }

    #[test]
    fn test_missing_program_is_spawn_failure() {
        let mut engine = CommandEngine::new("hintrun-engine-that-does-not-exist");
        let output = engine.lint("var a;", &Options::new(), &Globals::new());
        assert!(output.records.is_empty());
        assert!(matches!(output.failure, Some(EngineError::Spawn { .. })));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};
        use tempfile::tempdir;

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("engine.sh");
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_sends_request_on_stdin() {
            let dir = tempdir().unwrap();
            let captured = dir.path().join("request.json");
            let script = write_script(dir.path(), r#"cat > "$1"; echo '[]'"#);

            let mut options = Options::new();
            options.insert("undef".to_string(), true.into());
            let mut globals = Globals::new();
            globals.insert("jQuery".to_string(), false);

            let mut engine = CommandEngine::new(&script).with_args([&captured]);
            let output = engine.lint("var x = y", &options, &globals);
            assert!(!output.is_failure(), "{:?}", output.failure);

            let request: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&captured).unwrap()).unwrap();
            assert_eq!(
                request,
                serde_json::json!({
                    "source": "var x = y",
                    "options": {"undef": true},
                    "globals": {"jQuery": false}
                })
            );
        }

        #[test]
        fn test_engine_answering_before_reading_input() {
            let dir = tempdir().unwrap();
            let script = write_script(
                dir.path(),
                r#"head -c 200000 /dev/zero | tr '\000' ' '; echo '[{"line": 1, "character": 1, "reason": "early"}]'; cat > /dev/null"#,
            );

            let source = "a();\n".repeat(40_000);
            let mut engine = CommandEngine::new(&script);
            let output = engine.lint(&source, &Options::new(), &Globals::new());

            assert!(!output.is_failure(), "{:?}", output.failure);
            assert_eq!(output.records.len(), 1);
        }

        #[test]
        fn test_nonzero_exit_keeps_records() {
            let dir = tempdir().unwrap();
            let script = write_script(
                dir.path(),
                r#"cat > /dev/null; echo '[{"line": 3, "character": 2, "reason": "late"}]'; exit 3"#,
            );

            let mut engine = CommandEngine::new(&script);
            let output = engine.lint("", &Options::new(), &Globals::new());
            assert_eq!(output.records.len(), 1);
            assert!(matches!(output.failure, Some(EngineError::Exit(_))));
        }
    }
}
