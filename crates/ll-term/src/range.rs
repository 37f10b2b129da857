// SPDX-License-Identifier: MIT
//
// Line ranges — half-open intervals over a line of text.
//
// A range is always tagged with the unit its endpoints were authored in.
// Spans produced against raw source bytes and spans produced against the
// expanded display buffer are different coordinate spaces; keeping the unit
// in the type forces producers to say which one they mean.

/// The coordinate space a [`LineRange`]'s endpoints live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeUnit {
    /// Byte offsets into the raw source line.
    Bytes,
    /// Display-cell (column) offsets into the expanded buffer; a
    /// double-width glyph occupies two.
    #[default]
    Chars,
}

/// A half-open `[start, end)` interval over a line.
///
/// `end == None` means "to the end of whatever this is measured against".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    pub start: usize,
    pub end: Option<usize>,
    pub unit: RangeUnit,
}

impl LineRange {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
            unit: RangeUnit::Chars,
        }
    }

    /// An open-ended range starting at `start`.
    #[inline]
    #[must_use]
    pub const fn to_end(start: usize) -> Self {
        Self {
            start,
            end: None,
            unit: RangeUnit::Chars,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_unit(mut self, unit: RangeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Length, or `None` for open-ended ranges.
    #[inline]
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.end.map(|e| e.saturating_sub(self.start))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end.is_some_and(|e| e <= self.start)
    }

    /// Half-open containment test. Open-ended ranges accept any
    /// offset at or past `start`.
    #[inline]
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && self.end.is_none_or(|e| offset < e)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
