// SPDX-License-Identifier: MIT
//
// Text expansion — raw line bytes to a display-ready buffer.
//
// Log lines arrive as arbitrary bytes: tabs, control characters, broken
// UTF-8. Expansion walks them left to right producing a buffer that is
// safe to paint, plus the bookkeeping the resolver needs to relocate
// byte-unit style spans onto the expanded line:
//
//   - tabs become spaces up to the next multiple-of-8 column
//   - ESC/BS/BEL become single-width placeholder glyphs
//   - CR/LF become a space, other control bytes become U+24xx pictures
//   - malformed UTF-8 becomes `?`, advancing exactly one byte — expansion
//     never stalls and never reads past the buffer
//
// All window positions count display columns: a double-width glyph
// advances the index by two. Elements whose expansion shifts span
// placement record an adjustment at their source byte: tabs the fill
// minus one, multi-byte code points their width minus byte length, and
// each ESC/BS/BEL substitution a flat -1. Summing the deltas of all
// adjustments originating before a byte offset relocates that offset
// onto the expanded line.

use ll_term::range::LineRange;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

/// Tab stops sit every 8 columns.
const TAB_STOP: usize = 8;

/// One offset correction recorded at source byte `origin`; byte-unit
/// span endpoints past it shift by `delta` when remapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub origin: usize,
    pub delta: isize,
}

/// The result of expanding one line against a visible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedLine {
    /// Display text from column 0 up to the visible end boundary.
    /// Nothing past the boundary is materialized.
    pub buf: String,
    /// Byte sub-range of `buf` corresponding to the visible window.
    /// Both endpoints default to end-of-buffer when the corresponding
    /// boundary was never crossed (line shorter than the window).
    pub visible_bytes: std::ops::Range<usize>,
    /// Display columns consumed inside the window.
    pub chars_out: usize,
    /// Trailing display columns past the window, not shown.
    pub chars_remaining: usize,
    /// Span-offset corrections, in source order.
    pub adjustments: Vec<Adjustment>,
}

impl ExpandedLine {
    /// The visible slice of the expanded buffer.
    #[must_use]
    pub fn window(&self) -> &str {
        &self.buf[self.visible_bytes.clone()]
    }

    /// Remap a source byte offset onto the expanded line by applying
    /// every adjustment that originates before it.
    #[must_use]
    pub fn byte_to_col(&self, byte: usize) -> usize {
        let mut col = byte as isize;
        for adj in &self.adjustments {
            if adj.origin < byte {
                col += adj.delta;
            }
        }
        col.max(0).unsigned_abs()
    }
}

/// Expand `raw` against a column-unit visible range, materializing at
/// most `max_width` display columns of window content.
///
/// Pure: identical inputs produce identical output, including the
/// adjustment list.
#[must_use]
pub fn expand_line(raw: &[u8], visible: LineRange, max_width: usize) -> ExpandedLine {
    let vis_start = visible.start;
    let vis_end = visible
        .end
        .unwrap_or(usize::MAX)
        .min(vis_start.saturating_add(max_width));

    let mut buf = String::new();
    let mut adjustments = Vec::new();
    let mut byte = 0usize;
    let mut col = 0usize;
    let mut byte_start = None;
    let mut byte_end = None;
    let mut chars_out = None;
    let mut chars_remaining = 0usize;

    while byte < raw.len() {
        if byte_start.is_none() && col >= vis_start {
            byte_start = Some(buf.len());
        }

        let element = decode_element(raw, byte, col);

        if byte_end.is_none() {
            if byte_start.is_some() && col + element.width > vis_end {
                // The next element would cross the window's end; stop
                // here rather than splitting it.
                byte_end = Some(buf.len());
                chars_out = Some(col - vis_start);
                chars_remaining += element.width;
            } else {
                buf.push_str(&element.text);
            }
        } else {
            chars_remaining += element.width;
        }

        if element.delta != 0 {
            adjustments.push(Adjustment {
                origin: byte,
                delta: element.delta,
            });
        }

        byte += element.consumed;
        col += element.width;
    }

    let byte_start = byte_start.unwrap_or(buf.len());
    let byte_end = byte_end.unwrap_or(buf.len());
    let chars_out = chars_out.unwrap_or_else(|| col.saturating_sub(vis_start));

    ExpandedLine {
        buf,
        visible_bytes: byte_start..byte_end,
        chars_out,
        chars_remaining,
        adjustments,
    }
}

// ─── Element decoding ───────────────────────────────────────────────────────

struct Element {
    text: String,
    /// Display columns this element occupies.
    width: usize,
    /// Source bytes consumed.
    consumed: usize,
    /// Span-offset shift this element introduces.
    delta: isize,
}

impl Element {
    fn glyph(ch: char, width: usize) -> Self {
        Self {
            text: ch.to_string(),
            width,
            consumed: 1,
            delta: 0,
        }
    }

    /// A control-byte stand-in glyph: one column, one byte, and the
    /// fixed -1 shift byte-unit spans expect across it.
    fn placeholder(ch: char) -> Self {
        Self {
            text: ch.to_string(),
            width: 1,
            consumed: 1,
            delta: -1,
        }
    }
}

fn decode_element(raw: &[u8], byte: usize, col: usize) -> Element {
    let b = raw[byte];
    match b {
        b'\t' => {
            let fill = TAB_STOP - col % TAB_STOP;
            Element {
                text: " ".repeat(fill),
                width: fill,
                consumed: 1,
                delta: fill as isize - 1,
            }
        }
        0x1b => Element::placeholder('\u{238b}'), // ⎋
        0x08 => Element::placeholder('\u{232b}'), // ⌫
        0x07 => Element::placeholder('\u{1f514}'), // 🔔
        b'\r' | b'\n' => Element::glyph(' ', 1),
        // Remaining C0 controls become their control pictures.
        0x00..0x20 => {
            let ch = char::from_u32(0x2400 + u32::from(b)).unwrap_or('?');
            Element::glyph(ch, 1)
        }
        0x20..0x80 => {
            let ch = char::from(b);
            Element::glyph(ch, width_of(ch))
        }
        _ => decode_utf8(raw, byte),
    }
}

fn decode_utf8(raw: &[u8], byte: usize) -> Element {
    let len = match raw[byte] {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        // Continuation or invalid leading byte.
        _ => 0,
    };
    if len == 0 || byte + len > raw.len() {
        return Element::glyph('?', 1);
    }
    match std::str::from_utf8(&raw[byte..byte + len]) {
        Ok(s) => {
            // Exactly one code point by construction.
            let ch = s.chars().next().unwrap_or('?');
            let width = width_of(ch);
            Element {
                text: ch.to_string(),
                width,
                consumed: len,
                delta: width as isize - len as isize,
            }
        }
        Err(_) => Element::glyph('?', 1),
    }
}

fn width_of(ch: char) -> usize {
    ch.width().unwrap_or_else(|| {
        trace!(codepoint = %ch.escape_unicode(), "unknown display width, assuming 1");
        1
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
