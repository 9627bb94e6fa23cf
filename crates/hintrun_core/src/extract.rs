//! Lintable region extraction.

use std::sync::OnceLock;

use regex::Regex;

static SCRIPT_PATTERN: OnceLock<Regex> = OnceLock::new();

fn script_pattern() -> &'static Regex {
    SCRIPT_PATTERN.get_or_init(|| {
        Regex::new(r"(?is)<script[^>]*>(.*?)</script\s*>").expect("Invalid script pattern")
    })
}

/// A span of lintable text and where it sits in the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    /// The lintable text.
    pub text: &'a str,
    /// Lines preceding the region in the document.
    pub line_offset: u32,
    /// Columns to add to region-local positions. Always 0: columns are not
    /// adjusted for embedded scripts.
    pub char_offset: u32,
}

impl<'a> Region<'a> {
    /// A region covering the whole document.
    pub fn whole(text: &'a str) -> Self {
        Self {
            text,
            line_offset: 0,
            char_offset: 0,
        }
    }
}

/// Returns whether `source` looks like markup, i.e. its first character past
/// whitespace and any byte order mark is `<`.
pub fn is_markup(source: &str) -> bool {
    source
        .trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .starts_with('<')
}

/// Splits `source` into lintable regions, in document order.
///
/// Markup yields one region per `<script>` element; anything else is a single
/// region covering the whole text.
pub fn extract_regions(source: &str) -> Vec<Region<'_>> {
    if !is_markup(source) {
        return vec![Region::whole(source)];
    }

    script_pattern()
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|body| Region {
            text: body.as_str(),
            line_offset: count_lines(&source[..body.start()]),
            char_offset: 0,
        })
        .collect()
}

fn count_lines(text: &str) -> u32 {
    let count = text.bytes().filter(|&b| b == b'\n').count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
