//! Diagnostic pipeline.
//!
//! Extracts the lintable regions of a document, runs the engine on each of
//! them in document order, and renders the findings as
//! `line :: character :: message` lines with document-global positions.

use std::borrow::Cow;
use std::io::{self, Write};

use serde_json::Value;
use tracing::{debug, warn};

use hintrun_engine::{DiagnosticRecord, LintEngine};

use crate::extract::{Region, extract_regions};
use crate::Configuration;

/// Separator between the fields of an output line.
const SEPARATOR: &str = " :: ";

/// Drives a lint engine over a document with one resolved configuration.
pub struct DiagnosticPipeline<'c, E> {
    engine: E,
    configuration: &'c Configuration,
}

impl<'c, E: LintEngine> DiagnosticPipeline<'c, E> {
    /// Creates a pipeline around `engine`.
    pub fn new(engine: E, configuration: &'c Configuration) -> Self {
        Self {
            engine,
            configuration,
        }
    }

    /// Lints `source` and returns the rendered lines.
    pub fn run(&mut self, source: &str) -> Vec<String> {
        extract_regions(source)
            .iter()
            .flat_map(|region| self.lint_region(region))
            .collect()
    }

    /// Lints `source`, writing each rendered line to `out` as soon as its
    /// region is done.
    pub fn run_to<W: Write>(&mut self, source: &str, out: &mut W) -> io::Result<()> {
        for region in extract_regions(source) {
            for line in self.lint_region(&region) {
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    /// Lints one region and returns its rendered lines in order.
    ///
    /// An engine failure is logged; whatever the engine reported before
    /// failing is still rendered.
    pub fn lint_region(&mut self, region: &Region<'_>) -> Vec<String> {
        debug!(
            "Linting region of {} bytes at line offset {}",
            region.text.len(),
            region.line_offset
        );

        let output = self.engine.lint(
            region.text,
            &self.configuration.options,
            &self.configuration.globals,
        );
        if let Some(failure) = &output.failure {
            warn!("Lint engine failed: {}", failure);
        }

        let mut records = output.records;
        sort_records(&mut records);

        records
            .iter()
            .flatten()
            .filter_map(|record| format_record(record, region))
            .collect()
    }
}

/// Sorts records by position.
///
/// Records without a usable position go last; the rest are ordered by line,
/// then character. Records with equal keys keep their relative order.
pub fn sort_records(records: &mut [Option<DiagnosticRecord>]) {
    records.sort_by_key(|record| match record {
        Some(r) if r.has_position() => (false, r.line.unwrap_or(0), r.character.unwrap_or(0)),
        _ => (true, 0, 0),
    });
}

/// Renders the message of `record`.
///
/// Returns `None` when the record has no message template. When all four
/// placeholders are present, each of `{a}`..`{d}` in the template is replaced
/// once, in that order; otherwise the engine's own message is used.
pub fn render_message(record: &DiagnosticRecord) -> Option<String> {
    let raw = record.raw.as_deref()?;

    if let Some([a, b, c, d]) = record.placeholders() {
        let message = raw
            .replacen("{a}", &placeholder_text(a), 1)
            .replacen("{b}", &placeholder_text(b), 1)
            .replacen("{c}", &placeholder_text(c), 1)
            .replacen("{d}", &placeholder_text(d), 1);
        return Some(message);
    }

    Some(record.reason.clone().unwrap_or_else(|| raw.to_string()))
}

fn placeholder_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Renders one output line for `record` found in `region`, translating its
/// position to the document.
pub fn format_record(record: &DiagnosticRecord, region: &Region<'_>) -> Option<String> {
    let message = render_message(record)?;
    let line = record.line.unwrap_or(0).saturating_add(region.line_offset);
    let character = record
        .character
        .unwrap_or(0)
        .saturating_add(region.char_offset);

    Some(format!("{line}{SEPARATOR}{character}{SEPARATOR}{message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedEngine;
    use hintrun_engine::{EngineError, EngineOutput, OptionValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn undefined(line: u32, character: u32, name: &str) -> DiagnosticRecord {
        DiagnosticRecord::new(line, character, format!("'{}' is not defined.", name))
            .with_raw("'{a}' is not defined.")
            .with_code("W117")
    }

    fn undef_config() -> Configuration {
        let mut config = Configuration::new();
        config
            .options
            .insert("undef".to_string(), OptionValue::Bool(true));
        config
    }

    #[test]
    fn test_sort_positioned_before_positionless() {
        let mut records = vec![
            None,
            Some(DiagnosticRecord::new(5, 2, "e")),
            Some(DiagnosticRecord::default().with_raw("no position")),
            Some(DiagnosticRecord::new(2, 9, "b")),
            Some(DiagnosticRecord::new(2, 3, "a")),
            Some(DiagnosticRecord::new(0, 1, "line zero")),
        ];
        sort_records(&mut records);

        let reasons: Vec<_> = records
            .iter()
            .map(|r| r.as_ref().and_then(|r| r.reason.as_deref()))
            .collect();
        assert_eq!(
            reasons,
            vec![Some("a"), Some("b"), Some("e"), None, None, Some("line zero")]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_positions() {
        let mut records = vec![
            Some(DiagnosticRecord::new(1, 1, "first")),
            Some(DiagnosticRecord::new(1, 1, "second")),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].as_ref().unwrap().reason.as_deref(), Some("first"));
    }

    #[test]
    fn test_render_substitutes_all_placeholders_once() {
        let record = DiagnosticRecord::new(1, 1, "ignored")
            .with_raw("Expected '{a}' and instead saw '{b}' ({c}/{d}) {a}.")
            .with_placeholders([json!("{"), json!("["), json!(3), json!(true)]);

        assert_eq!(
            render_message(&record).unwrap(),
            "Expected '{' and instead saw '[' (3/true) {a}."
        );
    }

    #[test]
    fn test_render_substitution_is_left_to_right() {
        let record = DiagnosticRecord::new(1, 1, "ignored")
            .with_raw("{a} then {b}")
            .with_placeholders([json!("{b}"), json!("B"), json!(""), json!("")]);

        assert_eq!(render_message(&record).unwrap(), "B then {b}");
    }

    #[test]
    fn test_render_uses_reason_without_all_placeholders() {
        let mut record = undefined(1, 1, "y");
        record.a = Some(json!("y"));
        assert_eq!(render_message(&record).unwrap(), "'y' is not defined.");
    }

    #[test]
    fn test_render_skips_records_without_template() {
        assert_eq!(render_message(&DiagnosticRecord::new(1, 1, "plain")), None);
    }

    #[test]
    fn test_format_applies_offsets() {
        let region = Region {
            text: "",
            line_offset: 4,
            char_offset: 0,
        };
        let line = format_record(&undefined(2, 7, "y"), &region).unwrap();
        insta::assert_snapshot!(line, @"6 :: 7 :: 'y' is not defined.");
    }

    #[test]
    fn test_embedded_script_scenario() {
        let config = undef_config();
        let engine = ScriptedEngine::new().respond(EngineOutput::completed(vec![Some(
            undefined(1, 9, "y"),
        )]));
        let mut pipeline = DiagnosticPipeline::new(engine, &config);

        let lines = pipeline.run("<html><script>var x = y</script></html>");

        assert_eq!(lines, vec!["1 :: 9 :: 'y' is not defined."]);
        let engine = pipeline.engine;
        assert_eq!(engine.calls.len(), 1);
        assert_eq!(engine.calls[0].source, "var x = y");
        assert_eq!(engine.calls[0].options, config.options);
    }

    #[test]
    fn test_regions_linted_in_document_order_with_offsets() {
        let config = Configuration::new();
        let engine = ScriptedEngine::new()
            .respond(EngineOutput::completed(vec![Some(undefined(1, 1, "a"))]))
            .respond(EngineOutput::completed(vec![Some(undefined(1, 1, "b"))]));
        let mut pipeline = DiagnosticPipeline::new(engine, &config);

        let lines = pipeline.run("<div>\n<script>a</script>\n\n<script>b</script>");

        assert_eq!(
            lines,
            vec!["2 :: 1 :: 'a' is not defined.", "4 :: 1 :: 'b' is not defined."]
        );
    }

    #[test]
    fn test_engine_failure_keeps_partial_records_and_other_regions() {
        let config = Configuration::new();
        let engine = ScriptedEngine::new()
            .respond(EngineOutput::failed(
                vec![Some(undefined(3, 1, "early")), None],
                EngineError::aborted("crashed"),
            ))
            .respond(EngineOutput::failed(Vec::new(), EngineError::aborted("crashed")))
            .respond(EngineOutput::completed(vec![Some(undefined(1, 2, "late"))]));
        let mut pipeline = DiagnosticPipeline::new(engine, &config);

        let lines =
            pipeline.run("<p><script>one</script><script>two</script><script>three</script>");

        assert_eq!(
            lines,
            vec!["3 :: 1 :: 'early' is not defined.", "1 :: 2 :: 'late' is not defined."]
        );
    }

    #[test]
    fn test_output_is_sorted_per_region() {
        let config = Configuration::new();
        let engine = ScriptedEngine::new().respond(EngineOutput::completed(vec![
            None,
            Some(undefined(4, 1, "d")),
            Some(undefined(1, 10, "b")),
            Some(undefined(1, 2, "a")),
        ]));
        let mut pipeline = DiagnosticPipeline::new(engine, &config);

        let lines = pipeline.run("a; b;\n\n\nd;");
        assert_eq!(
            lines,
            vec![
                "1 :: 2 :: 'a' is not defined.",
                "1 :: 10 :: 'b' is not defined.",
                "4 :: 1 :: 'd' is not defined.",
            ]
        );
    }

    #[test]
    fn test_run_to_writes_lines() {
        let config = Configuration::new();
        let engine = ScriptedEngine::new()
            .respond(EngineOutput::completed(vec![Some(undefined(2, 5, "z"))]));
        let mut pipeline = DiagnosticPipeline::new(engine, &config);

        let mut out = Vec::new();
        pipeline.run_to("\nfoo(z);", &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2 :: 5 :: 'z' is not defined.\n"
        );
    }
}
