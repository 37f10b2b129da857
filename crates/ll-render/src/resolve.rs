// SPDX-License-Identifier: MIT
//
// Attribute resolution — from an unordered span list to per-cell attrs.
//
// The resolver works in display-column space: one output cell per window
// column, `width` cells total, window-relative. A double-width glyph owns
// two cells; its attributes live in the leading one. Spans arrive in any
// order; a stable sort by start offset imposes the total order, so
// later-declared spans win ties deterministically.
//
// Foreground/Background channel spans run in a dedicated pass whose
// results are written last. A `Background` span therefore beats any
// `Style` span touching the same cell, no matter the declaration order.

use ll_term::cell::{Attr, TextAttrs};
use ll_term::color::ColorUnit;
use ll_term::range::RangeUnit;
use ll_theme::role::Role;
use ll_theme::state::ThemeState;
use unicode_width::UnicodeWidthChar;

use crate::expand::Adjustment;
use crate::line::{SpanValue, StyleSpan};

/// One resolved cell: final attributes, and optionally a glyph that
/// replaces the buffer character (graphics, block elements, icons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolvedCell {
    pub glyph: Option<char>,
    pub attrs: TextAttrs,
}

/// The resolver's output: exactly `width` cells, plus the text covered by
/// a selected-text span when one was present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedLine {
    pub cells: Vec<ResolvedCell>,
    pub selection: Option<String>,
}

/// Resolve `spans` over the expanded buffer `text` into `width` cells.
///
/// `visible_start` is the buffer column where the window begins; span
/// coordinates are window-relative after clipping. Byte-unit spans are
/// remapped through `adjustments` first. Spans that fall entirely
/// outside the window are dropped, never an error.
#[must_use]
pub fn resolve_spans(
    theme: &ThemeState,
    text: &str,
    spans: &[StyleSpan],
    adjustments: &[Adjustment],
    visible_start: usize,
    width: usize,
    base: Role,
) -> ResolvedLine {
    // Each buffer character tagged with the column it starts at, for
    // recovering the text a column range covers.
    let chars: Vec<(usize, char)> = {
        let mut col = 0usize;
        text.chars()
            .map(|ch| {
                let start = col;
                col += ch.width().unwrap_or(1).max(1);
                (start, ch)
            })
            .collect()
    };
    let mut cells = vec![ResolvedCell::default(); width];
    let mut fg_over: Vec<Option<ColorUnit>> = vec![None; width];
    let mut bg_over: Vec<Option<ColorUnit>> = vec![None; width];
    let mut selection = None;

    // Remap into buffer column space, then stable-sort by start.
    let mut ordered: Vec<(usize, usize, SpanValue)> = spans
        .iter()
        .map(|span| {
            let (start, end) = remap_range(span, adjustments, visible_start + width);
            (start, end, span.value)
        })
        .collect();
    ordered.sort_by_key(|&(start, _, _)| start);

    for (start, end, value) in ordered {
        // Clip to the window; empty or out-of-range spans contribute
        // nothing.
        let rel_start = start.saturating_sub(visible_start);
        let rel_end = end.saturating_sub(visible_start).min(width);
        if rel_start >= rel_end {
            continue;
        }
        let covered = || -> String {
            let lo = visible_start + rel_start;
            let hi = visible_start + rel_end;
            chars
                .iter()
                .filter(|(start, _)| (lo..hi).contains(start))
                .map(|&(_, ch)| ch)
                .collect()
        };

        match value {
            SpanValue::Foreground(color) => {
                let color = resolve_semantic(theme, color, &covered());
                for slot in &mut fg_over[rel_start..rel_end] {
                    *slot = Some(color);
                }
            }
            SpanValue::Background(color) => {
                let color = resolve_semantic(theme, color, &covered());
                for slot in &mut bg_over[rel_start..rel_end] {
                    *slot = Some(color);
                }
            }
            SpanValue::Style(attrs) => {
                let attrs = with_semantic_resolved(theme, attrs, &covered());
                for cell in &mut cells[rel_start..rel_end] {
                    cell.attrs.overlay(&attrs);
                }
            }
            SpanValue::Role(role) => {
                let covered = covered();
                if role == Role::SelectedText {
                    selection = Some(covered.clone());
                }
                let attrs = with_semantic_resolved(theme, theme.attrs_for_role(role), &covered);
                for cell in &mut cells[rel_start..rel_end] {
                    cell.attrs.overlay(&attrs);
                }
            }
            SpanValue::RoleFg(role) => {
                let fg = resolve_semantic(theme, theme.attrs_for_role(role).fg, &covered());
                let attrs = TextAttrs::EMPTY.with_fg(fg);
                for cell in &mut cells[rel_start..rel_end] {
                    cell.attrs.overlay(&attrs);
                }
            }
            SpanValue::Level(level) => {
                let attrs = theme.level_attrs(level).normal;
                for cell in &mut cells[rel_start..rel_end] {
                    cell.attrs.overlay(&attrs);
                }
            }
            SpanValue::Graphic(glyph) => {
                let attrs = TextAttrs::EMPTY.with_attrs(Attr::ALTCHARSET);
                for cell in &mut cells[rel_start..rel_end] {
                    cell.glyph = Some(glyph);
                    cell.attrs.overlay(&attrs);
                }
            }
            SpanValue::BlockElem { glyph, role } => {
                let cell = &mut cells[rel_start];
                cell.glyph = Some(glyph);
                cell.attrs.overlay(&theme.attrs_for_role(role));
            }
            SpanValue::Icon(id) => {
                // A colored background behind an icon fights with the
                // cursor-line highlight, so the icon keeps only the
                // role's foreground and flags.
                if let Some((glyph, role)) = theme.icon(id) {
                    let attrs = theme.attrs_for_role(role).with_bg(ColorUnit::Transparent);
                    let cell = &mut cells[rel_start];
                    cell.glyph = Some(glyph);
                    cell.attrs.overlay(&attrs);
                }
            }
        }
    }

    // Channel overrides land last, then the base role fills the gaps, and
    // both channels pass through the theme's ANSI substitution.
    let base_attrs = theme.attrs_for_role(base);
    for (idx, cell) in cells.iter_mut().enumerate() {
        if let Some(fg) = fg_over[idx] {
            cell.attrs.fg = fg;
        }
        if let Some(bg) = bg_over[idx] {
            cell.attrs.bg = bg;
        }
        cell.attrs.underlay(&base_attrs);
        cell.attrs.fg = theme.ansi_to_theme(cell.attrs.fg);
        cell.attrs.bg = theme.ansi_to_theme(cell.attrs.bg);
    }

    ResolvedLine { cells, selection }
}

/// Translate a span's range into buffer column coordinates. Byte-unit
/// endpoints shift by every adjustment originating before them; an open
/// end means "to the window's end".
fn remap_range(span: &StyleSpan, adjustments: &[Adjustment], window_end: usize) -> (usize, usize) {
    let raw_end = span.range.end.unwrap_or(window_end);
    match span.range.unit {
        RangeUnit::Chars => (span.range.start, raw_end.max(span.range.start)),
        RangeUnit::Bytes => {
            let start = remap_offset(span.range.start, adjustments);
            let end = remap_offset(raw_end, adjustments);
            (start, end.max(start))
        }
    }
}

fn remap_offset(offset: usize, adjustments: &[Adjustment]) -> usize {
    let mut shifted = offset as isize;
    for adj in adjustments {
        if adj.origin < offset {
            shifted += adj.delta;
        }
    }
    shifted.max(0).unsigned_abs()
}

fn resolve_semantic(theme: &ThemeState, color: ColorUnit, covered: &str) -> ColorUnit {
    if color == ColorUnit::Semantic {
        theme.color_for_ident(covered)
    } else {
        color
    }
}

fn with_semantic_resolved(theme: &ThemeState, mut attrs: TextAttrs, covered: &str) -> TextAttrs {
    attrs.fg = resolve_semantic(theme, attrs.fg, covered);
    attrs.bg = resolve_semantic(theme, attrs.bg, covered);
    attrs
}

// ─── Tests ──────────────────────────────────────────────────────────────────
