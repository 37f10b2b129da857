// SPDX-License-Identifier: MIT
//
// Backend contract — what the renderer requires from a terminal.
//
// The engine never talks to a terminal directly. It paints through this
// trait: cell placement, row fill, cursor movement, and a capability query
// that tells the color model whether RGB can be passed through or must be
// matched down to a palette. Constructing a real backend is fallible
// (raw-mode setup, capability probing) and surfaces as a `Result` from the
// implementation's own constructor; everything past construction is
// infallible by design.
//
// `MemoryBackend` is the reference implementation: a plain cell grid used
// by tests and headless rendering.

use crate::cell::Cell;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }
}

// ─── Capabilities ───────────────────────────────────────────────────────────

/// What the attached terminal can do, queried once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Number of palette slots the terminal supports.
    pub color_count: u16,
    /// True when explicit RGB triples can be passed through unmodified.
    pub rgb: bool,
    /// The terminal's actual default background, when it can be queried.
    /// Used to special-case palette slot 0 in perceptual math.
    pub default_bg: Option<(u8, u8, u8)>,
}

impl Capabilities {
    /// A full-color terminal with an unknown default background.
    pub const TRUE_COLOR: Self = Self {
        color_count: 256,
        rgb: true,
        default_bg: None,
    };

    /// A 256-color terminal without RGB pass-through.
    pub const PALETTE_256: Self = Self {
        color_count: 256,
        rgb: false,
        default_bg: None,
    };
}

// ─── Backend trait ──────────────────────────────────────────────────────────

/// A character-cell display the render driver can paint into.
pub trait Backend {
    fn size(&self) -> Size;

    fn caps(&self) -> Capabilities;

    /// Place one cell. Out-of-bounds placements are ignored.
    fn put(&mut self, row: u16, col: u16, cell: Cell);

    /// Fill `len` cells starting at `(row, col)` with copies of `cell`,
    /// clipped to the row.
    fn fill(&mut self, row: u16, col: u16, len: u16, cell: Cell) {
        for i in 0..len {
            self.put(row, col.saturating_add(i), cell);
        }
    }

    fn move_cursor(&mut self, row: u16, col: u16);
}

// ─── MemoryBackend ──────────────────────────────────────────────────────────

/// An in-memory cell grid implementing [`Backend`].
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    size: Size,
    caps: Capabilities,
    cells: Vec<Cell>,
    cursor: (u16, u16),
}

impl MemoryBackend {
    /// A true-color grid of the given dimensions, all cells blank.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self::with_caps(cols, rows, Capabilities::TRUE_COLOR)
    }

    #[must_use]
    pub fn with_caps(cols: u16, rows: u16, caps: Capabilities) -> Self {
        let size = Size { cols, rows };
        Self {
            size,
            caps,
            cells: vec![Cell::BLANK; size.area() as usize],
            cursor: (0, 0),
        }
    }

    /// The cell at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn cell(&self, row: u16, col: u16) -> Option<&Cell> {
        if row >= self.size.rows || col >= self.size.cols {
            return None;
        }
        self.cells
            .get(row as usize * self.size.cols as usize + col as usize)
    }

    /// The glyphs of one row, concatenated. Panics on an out-of-bounds row.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        assert!(row < self.size.rows, "row {row} out of bounds");
        let start = row as usize * self.size.cols as usize;
        self.cells[start..start + self.size.cols as usize]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    #[must_use]
    pub const fn cursor(&self) -> (u16, u16) {
        self.cursor
    }
}

impl Backend for MemoryBackend {
    fn size(&self) -> Size {
        self.size
    }

    fn caps(&self) -> Capabilities {
        self.caps
    }

    fn put(&mut self, row: u16, col: u16, cell: Cell) {
        if row >= self.size.rows || col >= self.size.cols {
            return;
        }
        let idx = row as usize * self.size.cols as usize + col as usize;
        self.cells[idx] = cell;
    }

    fn move_cursor(&mut self, row: u16, col: u16) {
        self.cursor = (row, col);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Attr;
    use crate::color::Channel;
    use pretty_assertions::assert_eq;

    #[test]
    fn put_and_read_back() {
        let mut be = MemoryBackend::new(4, 2);
        let cell = Cell::new('x').with_fg(Channel::Palette(3));
        be.put(1, 2, cell);
        assert_eq!(be.cell(1, 2), Some(&cell));
        assert_eq!(be.cell(0, 0), Some(&Cell::BLANK));
    }

    #[test]
    fn out_of_bounds_put_is_ignored() {
        let mut be = MemoryBackend::new(4, 2);
        be.put(2, 0, Cell::new('x'));
        be.put(0, 4, Cell::new('x'));
        for row in 0..2 {
            assert_eq!(be.row_text(row), "    ");
        }
    }

    #[test]
    fn fill_clips_to_row() {
        let mut be = MemoryBackend::new(4, 1);
        be.fill(0, 2, 10, Cell::new('-').with_attrs(Attr::BOLD));
        assert_eq!(be.row_text(0), "  --");
    }

    #[test]
    fn cursor_tracks_moves() {
        let mut be = MemoryBackend::new(4, 4);
        be.move_cursor(3, 1);
        assert_eq!(be.cursor(), (3, 1));
    }

    #[test]
    fn area() {
        assert_eq!(Size { cols: 80, rows: 24 }.area(), 1920);
    }
}
