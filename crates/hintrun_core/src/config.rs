//! Configuration fragments and the effective configuration.

use std::path::Path;

use jsonc_parser::ParseOptions;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use hintrun_engine::{Globals, OptionValue, Options, global_flag};

use crate::ConfigError;

/// Dedicated configuration file name.
pub const JSHINTRC: &str = ".jshintrc";

/// Package manifest file name.
pub const PACKAGE_JSON: &str = "package.json";

/// Key under which a package manifest nests its configuration.
pub const MANIFEST_KEY: &str = "jshintConfig";

/// Key pointing at a base configuration file.
pub const EXTENDS_KEY: &str = "extends";

/// Keys that declare predefined globals.
pub const GLOBALS_KEYS: [&str; 2] = ["globals", "predef"];

/// The effective configuration handed to the lint engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Configuration {
    /// Lint options.
    pub options: Options,
    /// Predefined globals and whether they are assignable.
    pub globals: Globals,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a fragment on top of this configuration.
    ///
    /// Options are overwritten key by key. Globals accumulate; a global is only
    /// changed when the fragment declares that same name.
    pub fn apply(&mut self, fragment: Fragment) {
        self.options.extend(fragment.options);
        self.globals.extend(fragment.globals);
    }

    /// Returns whether nothing has been configured.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.globals.is_empty()
    }
}

/// One configuration file's contents, normalized but not yet merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub options: Options,
    pub globals: Globals,
    /// Unresolved `extends` target, as written in the file.
    pub extends: Option<String>,
}

impl Fragment {
    /// Parses a fragment from relaxed JSON.
    ///
    /// Comments and trailing commas are accepted. `path` is only used for
    /// error reporting.
    pub fn from_jsonc(content: &str, path: &Path) -> Result<Self, ConfigError> {
        parse_object(content, path).map(Self::from_object)
    }

    /// Builds a fragment from a parsed JSON object.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let mut fragment = Self::default();

        for (key, value) in object {
            if GLOBALS_KEYS.contains(&key.as_str()) {
                fragment.declare_globals(&key, value);
            } else if key == EXTENDS_KEY {
                match value {
                    Value::String(target) => fragment.extends = Some(target),
                    other => warn!("Ignoring non-string extends value: {}", other),
                }
            } else {
                fragment.options.insert(key, OptionValue::from_json(value));
            }
        }

        fragment
    }

    fn declare_globals(&mut self, key: &str, value: Value) {
        match value {
            Value::Array(names) => {
                for name in names {
                    match name {
                        Value::String(name) => {
                            self.globals.insert(name, true);
                        }
                        other => warn!("Ignoring non-string entry in {}: {}", key, other),
                    }
                }
            }
            Value::Object(flags) => {
                for (name, flag) in flags {
                    self.globals.insert(name, global_flag(&flag));
                }
            }
            other => warn!("Ignoring {} declared as {}", key, other),
        }
    }

    /// Overlays `local` on this fragment, which acts as its base.
    ///
    /// `local` wins key by key; globals from both are kept.
    pub fn overlay(mut self, local: Fragment) -> Fragment {
        self.options.extend(local.options);
        self.globals.extend(local.globals);
        self.extends = local.extends;
        self
    }
}

/// Parses relaxed JSON into a top-level object.
pub(crate) fn parse_object(content: &str, path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| ConfigError::parse(path, e.to_string()))?;

    match value {
        Some(Value::Object(object)) => Ok(object),
        Some(_) => Err(ConfigError::NotAnObject {
            path: path.to_path_buf(),
        }),
        None => Err(ConfigError::parse(path, "empty document")),
    }
}
