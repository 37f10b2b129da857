// SPDX-License-Identifier: MIT
//
// Palette — the terminal's concrete color slots, with precomputed Lab.
//
// Nearest-match queries and highlight-table construction both run over
// perceptual distance, so every slot's Lab value is computed once at
// build time. Slot 0 deserves care: terminals routinely remap "black"
// background to their own default, so when the backend can report its
// real default background that value replaces slot 0 in the Lab table.

use ll_term::backend::Capabilities;
use ll_term::color::{LabColor, ansi};

use crate::contrast::sufficient_contrast;

/// Number of slots in the identifier/highlight color table.
pub const HI_COLOR_COUNT: usize = 32;

/// One palette slot: display RGB plus its perceptual image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub rgb: (u8, u8, u8),
    pub lab: LabColor,
}

/// The active terminal palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// The standard 256-slot xterm palette, honoring the backend's real
    /// default background for slot 0 when known.
    #[must_use]
    pub fn xterm(caps: &Capabilities) -> Self {
        let count = usize::from(caps.color_count.clamp(16, 256));
        let mut entries = Vec::with_capacity(count);
        for idx in 0..count {
            #[allow(clippy::cast_possible_truncation)]
            let rgb = ansi::ansi256_to_rgb(idx as u8);
            entries.push(PaletteEntry {
                rgb,
                lab: LabColor::from_rgb(rgb.0, rgb.1, rgb.2),
            });
        }
        if let Some((r, g, b)) = caps.default_bg {
            entries[0].lab = LabColor::from_rgb(r, g, b);
        }
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entry(&self, idx: u8) -> Option<&PaletteEntry> {
        self.entries.get(usize::from(idx))
    }

    /// The slot whose Lab value is closest to `lab`.
    #[must_use]
    pub fn nearest(&self, lab: LabColor) -> u8 {
        let mut best = 0usize;
        let mut best_dist = f64::INFINITY;
        for (idx, entry) in self.entries.iter().enumerate() {
            let dist = entry.lab.delta_e(lab);
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        {
            best as u8
        }
    }

    /// Build the identifier/highlight color table against a text
    /// background.
    ///
    /// Candidates are the non-ANSI slots (16 and up) with sufficient
    /// contrast against `text_bg`, strongest contrast first, cycled to
    /// fill all [`HI_COLOR_COUNT`] slots. When nothing qualifies (tiny
    /// palettes, pathological backgrounds) every slot is 16 so lookups
    /// stay total.
    #[must_use]
    pub fn build_highlights(&self, text_bg: LabColor) -> [u8; HI_COLOR_COUNT] {
        let mut candidates: Vec<(u8, f64)> = self
            .entries
            .iter()
            .enumerate()
            .skip(16)
            .filter(|(_, e)| sufficient_contrast(e.lab, text_bg))
            .map(|(idx, e)| {
                #[allow(clippy::cast_possible_truncation)]
                (idx as u8, e.lab.delta_e(text_bg))
            })
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut table = [16u8; HI_COLOR_COUNT];
        if candidates.is_empty() {
            return table;
        }
        for (slot, entry) in table.iter_mut().zip(candidates.iter().cycle()) {
            *slot = entry.0;
        }
        table
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
