// SPDX-License-Identifier: MIT
//
// Render driver — expand, resolve, paint.
//
// One call paints one attributed line into a row window on the backend
// and reports how far through the line it got, so callers can page long
// lines across successive windows.

use ll_term::backend::Backend;
use ll_term::range::LineRange;
use ll_theme::role::Role;
use ll_theme::state::ThemeState;
use tracing::trace;
use unicode_width::UnicodeWidthChar;

use crate::expand::expand_line;
use crate::line::AttrLine;
use crate::resolve::resolve_spans;

/// What one `render_line` call accomplished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderResult {
    /// Display columns consumed inside the window.
    pub chars_out: usize,
    /// Display columns left unrendered past the window.
    pub chars_remaining: usize,
    /// Text covered by a selected-text span, when one was present.
    pub selection: Option<String>,
}

/// Paint `line` at `(row, col)`, showing the `visible` column window,
/// with `base` supplying attributes for cells no span touched.
///
/// The window extends from `col` to the backend's right edge. Cells past
/// the line's end are filled with the base role's blank cell so the row
/// background runs the full width.
pub fn render_line<B: Backend>(
    backend: &mut B,
    theme: &ThemeState,
    line: &AttrLine,
    row: u16,
    col: u16,
    visible: LineRange,
    base: Role,
) -> RenderResult {
    let max_width = usize::from(backend.size().cols.saturating_sub(col));
    let expanded = expand_line(line.text.as_bytes(), visible, max_width);

    let visible_start = col_width(&expanded.buf[..expanded.visible_bytes.start]);
    let window = expanded.window();
    let width = col_width(window);

    let resolved = resolve_spans(
        theme,
        &expanded.buf,
        &line.spans,
        &expanded.adjustments,
        visible_start,
        width,
        base,
    );
    trace!(row, col, width, chars_out = expanded.chars_out, "painting line");

    let mut out = col;
    let mut slot = 0usize;
    for ch in window.chars() {
        let Some(cell) = resolved.cells.get(slot) else {
            break;
        };
        let mut attrs = cell.attrs;
        attrs.fg = theme.match_color(attrs.fg);
        attrs.bg = theme.match_color(attrs.bg);
        let glyph = cell.glyph.unwrap_or(ch);
        backend.put(row, out, attrs.to_cell(glyph));
        // A double-width glyph spills into the next column and owns that
        // resolved cell too; the terminal renders the spill, we skip past
        // both.
        let advance = ch.width().unwrap_or(1).max(1);
        slot += advance;
        #[allow(clippy::cast_possible_truncation)]
        {
            out = out.saturating_add(advance as u16);
        }
    }

    let mut base_attrs = theme.attrs_for_role(base);
    base_attrs.fg = theme.match_color(theme.ansi_to_theme(base_attrs.fg));
    base_attrs.bg = theme.match_color(theme.ansi_to_theme(base_attrs.bg));
    let pad = backend.size().cols.saturating_sub(out);
    backend.fill(row, out, pad, base_attrs.to_cell(' '));

    RenderResult {
        chars_out: expanded.chars_out,
        chars_remaining: expanded.chars_remaining,
        selection: resolved.selection,
    }
}

fn col_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(1).max(1)).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::SpanValue;
    use ll_term::backend::{Capabilities, MemoryBackend};
    use ll_term::color::{Channel, ColorUnit};
    use ll_theme::role::Level;
    use ll_theme::theme::default_theme;
    use pretty_assertions::assert_eq;

    fn theme_with(caps: Capabilities) -> ThemeState {
        let mut report = |e| panic!("theme error: {e}");
        ThemeState::build(&default_theme(), caps, &mut report)
    }

    fn theme() -> ThemeState {
        theme_with(Capabilities::TRUE_COLOR)
    }

    fn full() -> LineRange {
        LineRange::to_end(0)
    }

    #[test]
    fn tab_aligns_to_eight_columns() {
        let mut be = MemoryBackend::new(12, 1);
        let th = theme();
        let line = AttrLine::new("a\tb");
        let res = render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        assert_eq!(be.row_text(0), "a       b   ");
        assert_eq!(res.chars_out, 3);
        assert_eq!(res.chars_remaining, 0);
    }

    #[test]
    fn row_background_runs_full_width() {
        let mut be = MemoryBackend::new(10, 1);
        let th = theme();
        let line = AttrLine::new("hi");
        render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        let text_bg = th.attrs_for_role(Role::Text).bg.to_channel_bg();
        assert_eq!(be.cell(0, 9).unwrap().bg, text_bg);
        assert_eq!(be.cell(0, 9).unwrap().ch, ' ');
    }

    #[test]
    fn narrow_window_reports_remainder() {
        let mut be = MemoryBackend::new(4, 1);
        let th = theme();
        let line = AttrLine::new("abcdefgh");
        let res = render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        assert_eq!(be.row_text(0), "abcd");
        assert_eq!(res.chars_out, 4);
        assert_eq!(res.chars_remaining, 4);
    }

    #[test]
    fn window_start_pages_through_the_line() {
        let mut be = MemoryBackend::new(4, 1);
        let th = theme();
        let line = AttrLine::new("abcdefgh");
        let res = render_line(&mut be, &th, &line, 0, 0, LineRange::to_end(4), Role::Text);
        assert_eq!(be.row_text(0), "efgh");
        assert_eq!(res.chars_out, 4);
        assert_eq!(res.chars_remaining, 0);
    }

    #[test]
    fn column_offset_shrinks_the_window() {
        let mut be = MemoryBackend::new(8, 1);
        let th = theme();
        let line = AttrLine::new("abcdef");
        let res = render_line(&mut be, &th, &line, 0, 5, full(), Role::Text);
        assert_eq!(&be.row_text(0)[5..], "abc");
        assert_eq!(res.chars_out, 3);
        assert_eq!(res.chars_remaining, 3);
    }

    #[test]
    fn span_colors_reach_the_backend() {
        let mut be = MemoryBackend::new(8, 1);
        let th = theme();
        let line = AttrLine::new("ERR ok")
            .with_span(LineRange::new(0, 3), SpanValue::Level(Level::Error));
        render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        let err_fg = th.level_attrs(Level::Error).normal.fg.to_channel_fg();
        let text_fg = th.attrs_for_role(Role::Text).fg.to_channel_fg();
        assert_eq!(be.cell(0, 0).unwrap().fg, err_fg);
        assert_eq!(be.cell(0, 2).unwrap().fg, err_fg);
        assert_eq!(be.cell(0, 4).unwrap().fg, text_fg);
    }

    #[test]
    fn rgb_is_matched_down_on_palette_terminals() {
        let mut be = MemoryBackend::with_caps(4, 1, Capabilities::PALETTE_256);
        let th = theme_with(Capabilities::PALETTE_256);
        let line = AttrLine::new("x").with_span(
            LineRange::new(0, 1),
            SpanValue::Foreground(ColorUnit::Rgb(255, 0, 0)),
        );
        render_line(&mut be, &th, &line, 0, 0, full(), Role::None);
        assert_eq!(be.cell(0, 0).unwrap().fg, Channel::Palette(9));
    }

    #[test]
    fn wide_glyph_advances_two_columns() {
        let mut be = MemoryBackend::new(6, 1);
        let th = theme();
        let line = AttrLine::new("日x");
        render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        assert_eq!(be.cell(0, 0).unwrap().ch, '日');
        assert_eq!(be.cell(0, 2).unwrap().ch, 'x');
    }

    #[test]
    fn span_survives_leading_wide_glyph() {
        use ll_term::range::RangeUnit;
        let mut be = MemoryBackend::new(6, 1);
        let th = theme();
        // 日 is 3 bytes / 2 columns; the byte span over the x must color
        // the cell the x actually lands on.
        let line = AttrLine::new("日x").with_span(
            LineRange::new(3, 4).with_unit(RangeUnit::Bytes),
            SpanValue::Level(Level::Error),
        );
        render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        let err_fg = th.level_attrs(Level::Error).normal.fg.to_channel_fg();
        assert_eq!(be.cell(0, 2).unwrap().ch, 'x');
        assert_eq!(be.cell(0, 2).unwrap().fg, err_fg);
        assert_ne!(be.cell(0, 0).unwrap().fg, err_fg);
    }

    #[test]
    fn selection_surfaces_in_the_result() {
        let mut be = MemoryBackend::new(16, 1);
        let th = theme();
        let line = AttrLine::new("pick me up")
            .with_span(LineRange::new(5, 7), SpanValue::Role(Role::SelectedText));
        let res = render_line(&mut be, &th, &line, 0, 0, full(), Role::Text);
        assert_eq!(res.selection.as_deref(), Some("me"));
    }

    #[test]
    fn zero_width_window_renders_nothing() {
        let mut be = MemoryBackend::new(4, 1);
        let th = theme();
        let line = AttrLine::new("abc");
        let res = render_line(&mut be, &th, &line, 0, 4, full(), Role::Text);
        assert_eq!(be.row_text(0), "    ");
        assert_eq!(res.chars_out, 0);
        assert_eq!(res.chars_remaining, 3);
    }
}
