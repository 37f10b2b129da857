// SPDX-License-Identifier: MIT
//
// Color model — semantic color units and perceptual Lab math.
//
// Colors flow through three representations:
//
//   ColorUnit  — what a style annotation or theme rule says ("transparent",
//                "derive from the text", palette slot, explicit RGB)
//   LabColor   — perceptual space (Oklab, lightness scaled to 0..100) used
//                for distance, contrast, and lightness arithmetic; never
//                painted directly
//   Channel    — what a terminal backend actually accepts (default slot,
//                palette index, or RGB triple)
//
// The Oklab conversion follows Björn Ottosson's reference matrices. We work
// in f64 here: this path runs at theme-build time and for occasional
// nearest-palette matches, never per frame.

// ─── ColorUnit ──────────────────────────────────────────────────────────────

/// A color value that has not yet been resolved to a terminal primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorUnit {
    /// No color: inherit whatever is underneath.
    #[default]
    Transparent,
    /// Derive the color from the styled text itself (identifier hashing).
    /// Must be resolved before painting.
    Semantic,
    /// A slot in the terminal's 256-color palette.
    Palette(u8),
    /// An explicit RGB triple.
    Rgb(u8, u8, u8),
}

impl ColorUnit {
    #[inline]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Parse a literal hex color: `#rgb` or `#rrggbb`.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let (r, g, b) = parse_hex(s)?;
        Some(Self::Rgb(r, g, b))
    }

    /// Perceptual representation, if this unit names a concrete color.
    ///
    /// `Palette` converts through the standard xterm RGB values; callers
    /// holding an active palette (which may override slot 0) should prefer
    /// its precomputed table.
    #[must_use]
    pub fn to_lab(self) -> Option<LabColor> {
        match self {
            Self::Transparent | Self::Semantic => None,
            Self::Palette(idx) => {
                let (r, g, b) = ansi::ansi256_to_rgb(idx);
                Some(LabColor::from_rgb(r, g, b))
            }
            Self::Rgb(r, g, b) => Some(LabColor::from_rgb(r, g, b)),
        }
    }

    /// Encode as a foreground channel.
    ///
    /// Palette slot 15 (white) maps to the backend default: themes that say
    /// "white text" mean "the terminal's text color", not literal white.
    #[must_use]
    pub const fn to_channel_fg(self) -> Channel {
        match self {
            Self::Transparent | Self::Semantic | Self::Palette(15) => Channel::Default,
            Self::Palette(idx) => Channel::Palette(idx),
            Self::Rgb(r, g, b) => Channel::Rgb(r, g, b),
        }
    }

    /// Encode as a background channel.
    ///
    /// Palette slot 0 (black) maps to the backend default so "black
    /// background" never paints literal black over a terminal whose
    /// default background is something else.
    #[must_use]
    pub const fn to_channel_bg(self) -> Channel {
        match self {
            Self::Transparent | Self::Semantic | Self::Palette(0) => Channel::Default,
            Self::Palette(idx) => Channel::Palette(idx),
            Self::Rgb(r, g, b) => Channel::Rgb(r, g, b),
        }
    }
}

// ─── Channel ────────────────────────────────────────────────────────────────

/// A terminal color primitive, as consumed by backend placement calls.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// The backend's configured default for this channel.
    #[default]
    Default,
    Palette(u8),
    Rgb(u8, u8, u8),
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Palette(idx) => write!(f, "palette({idx})"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ─── LabColor ───────────────────────────────────────────────────────────────

/// A color in perceptual space: Oklab with all components scaled by 100,
/// so `l` runs 0 (black) to 100 (white).
///
/// Numeric distance here approximates perceived difference, which is what
/// contrast checks and nearest-palette matching need. Lab values are never
/// painted; convert back with [`to_rgb`](Self::to_rgb) first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabColor {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl LabColor {
    #[inline]
    #[must_use]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert an sRGB triple into scaled Oklab.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let lr = srgb_to_linear(f64::from(r) / 255.0);
        let lg = srgb_to_linear(f64::from(g) / 255.0);
        let lb = srgb_to_linear(f64::from(b) / 255.0);
        let (l, a, b) = linear_srgb_to_oklab(lr, lg, lb);
        Self::new(l * 100.0, a * 100.0, b * 100.0)
    }

    /// Convert back to sRGB, clamping out-of-gamut components.
    #[must_use]
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let (lr, lg, lb) = oklab_to_linear_srgb(self.l / 100.0, self.a / 100.0, self.b / 100.0);
        (
            to_u8(linear_to_srgb(lr.clamp(0.0, 1.0))),
            to_u8(linear_to_srgb(lg.clamp(0.0, 1.0))),
            to_u8(linear_to_srgb(lb.clamp(0.0, 1.0))),
        )
    }

    /// Euclidean distance (ΔE) in scaled Oklab.
    #[inline]
    #[must_use]
    pub fn delta_e(self, other: Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        db.mul_add(db, dl.mul_add(dl, da * da)).sqrt()
    }

    /// The same color with its lightness replaced.
    #[inline]
    #[must_use]
    pub const fn with_lightness(mut self, l: f64) -> Self {
        self.l = l;
        self
    }
}

// ─── Hex parsing ────────────────────────────────────────────────────────────

/// Parse `#rgb` or `#rrggbb` into an RGB triple.
#[must_use]
pub fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    let digit = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let b = hex.as_bytes();
    match b.len() {
        3 => {
            let r = digit(b[0])?;
            let g = digit(b[1])?;
            let bl = digit(b[2])?;
            Some((r << 4 | r, g << 4 | g, bl << 4 | bl))
        }
        6 => {
            let r = digit(b[0])? << 4 | digit(b[1])?;
            let g = digit(b[2])? << 4 | digit(b[3])?;
            let bl = digit(b[4])? << 4 | digit(b[5])?;
            Some((r, g, bl))
        }
        _ => None,
    }
}

// ─── Oklab ↔ linear sRGB ────────────────────────────────────────────────────

fn linear_srgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.051_445_995f64.mul_add(b, 0.412_221_47f64.mul_add(r, 0.536_332_55 * g));
    let m = 0.107_396_96f64.mul_add(b, 0.211_903_5f64.mul_add(r, 0.680_699_5 * g));
    let s = 0.629_978_7f64.mul_add(b, 0.088_302_46f64.mul_add(r, 0.281_718_84 * g));

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    let l_ok = 0.004_072_047f64.mul_add(-s_, 0.210_454_26f64.mul_add(l_, 0.793_617_8 * m_));
    let a = 0.450_593_7f64.mul_add(s_, 1.977_998_5f64.mul_add(l_, -(2.428_592_2 * m_)));
    let b_ok = 0.808_675_77f64.mul_add(-s_, 0.025_904_037f64.mul_add(l_, 0.782_771_77 * m_));

    (l_ok, a, b_ok)
}

fn oklab_to_linear_srgb(l_ok: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = 0.215_803_76f64.mul_add(b, 0.396_337_78f64.mul_add(a, l_ok));
    let m_ = 0.063_854_17f64.mul_add(-b, 0.105_561_346f64.mul_add(-a, l_ok));
    let s_ = 1.291_485_5f64.mul_add(-b, 0.089_484_18f64.mul_add(-a, l_ok));

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let r = 0.230_969_94f64.mul_add(s, 4.076_741_7f64.mul_add(l, -(3.307_711_6 * m)));
    let g = 0.341_319_38f64.mul_add(-s, (-1.268_438f64).mul_add(l, 2.609_757_4 * m));
    let bl = 1.707_614_7f64.mul_add(s, (-0.004_196_086_3f64).mul_add(l, -(0.703_418_6 * m)));

    (r, g, bl)
}

// ─── Gamma ──────────────────────────────────────────────────────────────────

/// sRGB gamma decode: display value to linear light.
#[must_use]
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB gamma encode: linear light to display value.
#[must_use]
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f64.mul_add(c.powf(1.0 / 2.4), -0.055)
    }
}

fn to_u8(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── ANSI palette values ────────────────────────────────────────────────────

pub mod ansi {
    //! Standard xterm palette RGB values.

    /// The 16 base ANSI colors (xterm defaults).
    pub const ANSI16_RGB: [(u8, u8, u8); 16] = [
        (0, 0, 0),       // 0: Black
        (128, 0, 0),     // 1: Red
        (0, 128, 0),     // 2: Green
        (128, 128, 0),   // 3: Yellow
        (0, 0, 128),     // 4: Blue
        (128, 0, 128),   // 5: Magenta
        (0, 128, 128),   // 6: Cyan
        (192, 192, 192), // 7: White
        (128, 128, 128), // 8: Bright Black
        (255, 0, 0),     // 9: Bright Red
        (0, 255, 0),     // 10: Bright Green
        (255, 255, 0),   // 11: Bright Yellow
        (0, 0, 255),     // 12: Bright Blue
        (255, 0, 255),   // 13: Bright Magenta
        (0, 255, 255),   // 14: Bright Cyan
        (255, 255, 255), // 15: Bright White
    ];

    /// Convert an ANSI-256 palette index to RGB values.
    #[must_use]
    pub fn ansi256_to_rgb(idx: u8) -> (u8, u8, u8) {
        match idx {
            0..=15 => ANSI16_RGB[idx as usize],

            // 6×6×6 color cube (indices 16–231)
            16..=231 => {
                let idx = idx - 16;
                let r_idx = idx / 36;
                let g_idx = (idx % 36) / 6;
                let b_idx = idx % 6;

                // The cube uses: 0, 95, 135, 175, 215, 255
                let to_value = |i: u8| -> u8 { if i == 0 { 0 } else { 55 + 40 * i } };

                (to_value(r_idx), to_value(g_idx), to_value(b_idx))
            }

            // Grayscale ramp (indices 232–255)
            232..=255 => {
                let v = 8 + 10 * (idx - 232);
                (v, v, v)
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
