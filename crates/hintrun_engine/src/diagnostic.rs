//! Diagnostic records reported by the lint engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One finding reported by the lint engine.
///
/// Positions are 1-based and relative to the text handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// Line of the finding; absent or `0` when the engine could not localize it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Column of the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<u32>,

    /// Fully rendered message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Message template with `{a}`..`{d}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,

    /// Engine-specific message code, e.g. `W117`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// The offending source line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl DiagnosticRecord {
    /// Creates a positioned record with a plain message.
    pub fn new(line: u32, character: u32, reason: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            character: Some(character),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Sets the message template.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Sets all four template placeholders.
    pub fn with_placeholders(mut self, values: [Value; 4]) -> Self {
        let [a, b, c, d] = values;
        self.a = Some(a);
        self.b = Some(b);
        self.c = Some(c);
        self.d = Some(d);
        self
    }

    /// Sets the message code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns whether the engine localized this finding.
    pub fn has_position(&self) -> bool {
        matches!(self.line, Some(line) if line > 0)
    }

    /// Returns the four placeholder values when every one of them is present.
    pub fn placeholders(&self) -> Option<[&Value; 4]> {
        Some([
            self.a.as_ref()?,
            self.b.as_ref()?,
            self.c.as_ref()?,
            self.d.as_ref()?,
        ])
    }
}
