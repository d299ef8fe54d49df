//! Line scanner for question package text.
//!
//! Splits a raw text blob into numbered, trimmed lines. Handles `\r\n`
//! line endings and a leading UTF-8 byte-order mark.

/// A single trimmed line of package text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text
    pub number: usize,
    /// Line content with surrounding whitespace removed
    pub text: &'a str,
}

impl Line<'_> {
    /// Whether the line is empty after trimming.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Scans `raw` into trimmed lines.
///
/// Blank lines are kept: they are section boundaries for the parser.
pub fn scan(raw: &str) -> impl Iterator<Item = Line<'_>> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    raw.lines().enumerate().map(|(i, text)| Line {
        number: i + 1,
        text: text.trim(),
    })
}
