// SPDX-License-Identifier: MIT
//
// Attributed lines — raw text plus unordered style annotations.

use ll_term::cell::TextAttrs;
use ll_term::color::ColorUnit;
use ll_term::range::LineRange;
use ll_theme::role::{IconId, Level, Role};

/// The payload of one style annotation.
///
/// The resolver dispatches on this exhaustively; adding a variant is a
/// compile-checked decision point in `resolve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanValue {
    /// A role's full resolved attributes.
    Role(Role),
    /// Only the foreground channel of a role.
    RoleFg(Role),
    /// A literal attribute bundle.
    Style(TextAttrs),
    /// A substitute glyph painted across the range, in the alternate
    /// (line-drawing) character set.
    Graphic(char),
    /// A log severity's resolved attributes.
    Level(Level),
    /// Set just the foreground channel.
    Foreground(ColorUnit),
    /// Set just the background channel.
    Background(ColorUnit),
    /// One literal code point at the span's start cell, colored by a role.
    BlockElem { glyph: char, role: Role },
    /// A themed icon glyph at the span's start cell.
    Icon(IconId),
}

/// One semantic annotation over a sub-range of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleSpan {
    pub range: LineRange,
    pub value: SpanValue,
}

impl StyleSpan {
    #[inline]
    #[must_use]
    pub const fn new(range: LineRange, value: SpanValue) -> Self {
        Self { range, value }
    }
}

/// Owning pair of raw line text and its style annotations.
///
/// Spans may overlap arbitrarily and arrive in any order; the resolver
/// imposes ordering. The text is never mutated by resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrLine {
    pub text: String,
    pub spans: Vec<StyleSpan>,
}

impl AttrLine {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_span(mut self, range: LineRange, value: SpanValue) -> Self {
        self.spans.push(StyleSpan::new(range, value));
        self
    }

    pub fn push_span(&mut self, range: LineRange, value: SpanValue) {
        self.spans.push(StyleSpan::new(range, value));
    }
}

impl From<&str> for AttrLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_spans_in_order() {
        let line = AttrLine::new("hello")
            .with_span(LineRange::new(0, 2), SpanValue::Role(Role::Error))
            .with_span(LineRange::new(1, 3), SpanValue::Level(Level::Warning));
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].value, SpanValue::Role(Role::Error));
    }

    #[test]
    fn from_str_has_no_spans() {
        let line: AttrLine = "plain".into();
        assert!(line.spans.is_empty());
        assert_eq!(line.text, "plain");
    }
}
