// SPDX-License-Identifier: MIT
//
// Cell and attribute model — the unit of everything drawn on screen.
//
// `Attr` is the style-flag set a cell can carry, `TextAttrs` is the
// resolver-facing bundle (semantic color units plus flags), and `Cell` is
// the backend-facing result (concrete channels plus flags). The overlay
// and underlay merges on `TextAttrs` encode the precedence rules the
// attribute resolver relies on, including the double-reverse cancellation.

use bitflags::bitflags;

use crate::color::{Channel, ColorUnit};

// ─── Attributes ─────────────────────────────────────────────────────────────

bitflags! {
    /// Text style attributes. Fits in one byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const BOLD          = 0b0000_0001;
        const UNDERLINE     = 0b0000_0010;
        const ITALIC        = 0b0000_0100;
        const STRUCK        = 0b0000_1000;
        /// Swap foreground and background at paint time.
        const REVERSE       = 0b0001_0000;
        /// Glyph comes from the alternate (line-drawing) character set.
        const ALTCHARSET    = 0b0010_0000;
        const BLINK         = 0b0100_0000;
    }
}

// ─── TextAttrs ──────────────────────────────────────────────────────────────

/// A style bundle for a run of cells, before terminal encoding.
///
/// Color channels are `ColorUnit`s, so a bundle can still say "transparent"
/// (inherit whatever is underneath) or "semantic" (derive from the styled
/// text). Both must be resolved before a `Cell` can be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextAttrs {
    pub fg: ColorUnit,
    pub bg: ColorUnit,
    pub attrs: Attr,
}

impl TextAttrs {
    /// A fully transparent, flag-free bundle.
    pub const EMPTY: Self = Self {
        fg: ColorUnit::Transparent,
        bg: ColorUnit::Transparent,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: ColorUnit) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: ColorUnit) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// True when no channel is set and no flag is on.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_transparent() && self.bg.is_transparent() && self.attrs.is_empty()
    }

    /// Merge `other` on top of `self`.
    ///
    /// Flags are OR'd, set color channels overwrite, with one exception:
    /// when both sides carry `REVERSE` the flag cancels out entirely. Two
    /// independent "invert this" requests would otherwise re-invert back
    /// to an unreadable state (e.g. a selection crossing a search hit).
    pub fn overlay(&mut self, other: &Self) {
        let mut incoming = other.attrs;
        if self.attrs.contains(Attr::REVERSE) && incoming.contains(Attr::REVERSE) {
            self.attrs.remove(Attr::REVERSE);
            incoming.remove(Attr::REVERSE);
        }
        self.attrs |= incoming;
        if !other.fg.is_transparent() {
            self.fg = other.fg;
        }
        if !other.bg.is_transparent() {
            self.bg = other.bg;
        }
    }

    /// Merge `base` underneath `self`: existing channels win, base fills
    /// the gaps. Flags follow the same rules as [`overlay`](Self::overlay).
    pub fn underlay(&mut self, base: &Self) {
        let mut incoming = base.attrs;
        if self.attrs.contains(Attr::REVERSE) && incoming.contains(Attr::REVERSE) {
            self.attrs.remove(Attr::REVERSE);
            incoming.remove(Attr::REVERSE);
        }
        self.attrs |= incoming;
        if self.fg.is_transparent() {
            self.fg = base.fg;
        }
        if self.bg.is_transparent() {
            self.bg = base.bg;
        }
    }

    /// Encode into a backend cell carrying the glyph `ch`.
    ///
    /// Channels resolve through the fixed default-color mapping (see
    /// [`ColorUnit::to_channel_fg`] / [`to_channel_bg`](ColorUnit::to_channel_bg)).
    #[must_use]
    pub fn to_cell(&self, ch: char) -> Cell {
        Cell {
            ch,
            fg: self.fg.to_channel_fg(),
            bg: self.bg.to_channel_bg(),
            attrs: self.attrs,
        }
    }
}

// ─── Cell ───────────────────────────────────────────────────────────────────

/// One concrete screen cell: glyph plus encoded channels plus flags.
///
/// This is what crosses the backend boundary. Color channels are already
/// terminal primitives (`Channel`), never semantic units.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub ch: char,
    pub fg: Channel,
    pub bg: Channel,
    pub attrs: Attr,
}

impl Cell {
    /// A blank cell: space glyph, default channels, no flags.
    pub const BLANK: Self = Self {
        ch: ' ',
        fg: Channel::Default,
        bg: Channel::Default,
        attrs: Attr::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch,
            fg: Channel::Default,
            bg: Channel::Default,
            attrs: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: Channel) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: Channel) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// True when both cells share channels and flags (glyph ignored).
    #[inline]
    #[must_use]
    pub fn same_style(&self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell({:?} fg={:?} bg={:?} attrs={:?})",
            self.ch, self.fg, self.bg, self.attrs
        )
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Attr ───────────────────────────────────────────────────────────

    #[test]
    fn attr_fits_in_a_byte() {
        assert_eq!(std::mem::size_of::<Attr>(), 1);
    }

    #[test]
    fn attr_flags_are_independent() {
        let a = Attr::BOLD | Attr::REVERSE;
        assert!(a.contains(Attr::BOLD));
        assert!(a.contains(Attr::REVERSE));
        assert!(!a.contains(Attr::UNDERLINE));
    }

    // ── Overlay merge ──────────────────────────────────────────────────

    #[test]
    fn overlay_ors_flags() {
        let mut a = TextAttrs::EMPTY.with_attrs(Attr::BOLD);
        a.overlay(&TextAttrs::EMPTY.with_attrs(Attr::UNDERLINE));
        assert_eq!(a.attrs, Attr::BOLD | Attr::UNDERLINE);
    }

    #[test]
    fn overlay_overwrites_set_channels() {
        let mut a = TextAttrs::EMPTY.with_fg(ColorUnit::Palette(1));
        a.overlay(&TextAttrs::EMPTY.with_fg(ColorUnit::Palette(2)));
        assert_eq!(a.fg, ColorUnit::Palette(2));
    }

    #[test]
    fn overlay_keeps_channel_when_incoming_transparent() {
        let mut a = TextAttrs::EMPTY.with_bg(ColorUnit::Rgb(10, 20, 30));
        a.overlay(&TextAttrs::EMPTY.with_attrs(Attr::BOLD));
        assert_eq!(a.bg, ColorUnit::Rgb(10, 20, 30));
    }

    #[test]
    fn double_reverse_cancels() {
        let mut a = TextAttrs::EMPTY.with_attrs(Attr::REVERSE);
        a.overlay(&TextAttrs::EMPTY.with_attrs(Attr::REVERSE));
        assert!(!a.attrs.contains(Attr::REVERSE));
    }

    #[test]
    fn single_reverse_survives() {
        let mut a = TextAttrs::EMPTY;
        a.overlay(&TextAttrs::EMPTY.with_attrs(Attr::REVERSE));
        assert!(a.attrs.contains(Attr::REVERSE));
    }

    #[test]
    fn reverse_cancel_preserves_other_flags() {
        let mut a = TextAttrs::EMPTY.with_attrs(Attr::REVERSE | Attr::BOLD);
        a.overlay(&TextAttrs::EMPTY.with_attrs(Attr::REVERSE | Attr::UNDERLINE));
        assert_eq!(a.attrs, Attr::BOLD | Attr::UNDERLINE);
    }

    // ── Underlay merge ─────────────────────────────────────────────────

    #[test]
    fn underlay_fills_only_gaps() {
        let mut a = TextAttrs::EMPTY.with_fg(ColorUnit::Palette(4));
        let base = TextAttrs::EMPTY
            .with_fg(ColorUnit::Palette(7))
            .with_bg(ColorUnit::Palette(0));
        a.underlay(&base);
        assert_eq!(a.fg, ColorUnit::Palette(4));
        assert_eq!(a.bg, ColorUnit::Palette(0));
    }

    #[test]
    fn underlay_double_reverse_cancels() {
        let mut a = TextAttrs::EMPTY.with_attrs(Attr::REVERSE);
        a.underlay(&TextAttrs::EMPTY.with_attrs(Attr::REVERSE));
        assert!(!a.attrs.contains(Attr::REVERSE));
    }

    // ── Cell ───────────────────────────────────────────────────────────

    #[test]
    fn blank_cell_is_default_everything() {
        assert_eq!(Cell::BLANK.ch, ' ');
        assert_eq!(Cell::BLANK.fg, Channel::Default);
        assert_eq!(Cell::BLANK.bg, Channel::Default);
        assert!(Cell::BLANK.attrs.is_empty());
    }

    #[test]
    fn same_style_ignores_glyph() {
        let a = Cell::new('a').with_fg(Channel::Palette(3));
        let b = Cell::new('b').with_fg(Channel::Palette(3));
        assert!(a.same_style(&b));
        assert!(!a.same_style(&b.with_attrs(Attr::BOLD)));
    }

    #[test]
    fn to_cell_encodes_channels() {
        let ta = TextAttrs::EMPTY
            .with_fg(ColorUnit::Rgb(1, 2, 3))
            .with_attrs(Attr::BOLD);
        let cell = ta.to_cell('x');
        assert_eq!(cell.ch, 'x');
        assert_eq!(cell.fg, Channel::Rgb(1, 2, 3));
        assert_eq!(cell.bg, Channel::Default);
        assert_eq!(cell.attrs, Attr::BOLD);
    }
}
