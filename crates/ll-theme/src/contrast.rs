// SPDX-License-Identifier: MIT
//
// Contrast math — readability checks and derived background lightness.
//
// Two systems live here. WCAG relative luminance gives the standard
// contrast ratio for pass/fail checks against concrete RGB values.
// Everything else works in scaled Oklab, where lightness arithmetic
// tracks perception well enough to derive overlay backgrounds and the
// time-column gradient without theme authors specifying them.

use ll_term::color::{LabColor, srgb_to_linear};

/// Minimum Lab lightness separation for highlight candidates.
const MIN_LIGHTNESS_DIFF: f64 = 15.0;

/// Minimum Lab ΔE for highlight candidates.
const MIN_DELTA_E: f64 = 20.0;

// ─── WCAG ───────────────────────────────────────────────────────────────────

/// WCAG 2.x relative luminance of an sRGB color, 0.0 (black) to 1.0 (white).
#[must_use]
pub fn relative_luminance(rgb: (u8, u8, u8)) -> f64 {
    let r = srgb_to_linear(f64::from(rgb.0) / 255.0);
    let g = srgb_to_linear(f64::from(rgb.1) / 255.0);
    let b = srgb_to_linear(f64::from(rgb.2) / 255.0);
    0.0722f64.mul_add(b, 0.2126f64.mul_add(r, 0.7152 * g))
}

/// WCAG contrast ratio between two colors: 1.0 (identical) to 21.0
/// (black on white). Symmetric.
#[must_use]
pub fn contrast_ratio(a: (u8, u8, u8), b: (u8, u8, u8)) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

// ─── Perceptual checks ──────────────────────────────────────────────────────

/// Whether `color` reads clearly against `bg`: enough lightness separation
/// and enough overall perceptual distance.
#[must_use]
pub fn sufficient_contrast(color: LabColor, bg: LabColor) -> bool {
    (color.l - bg.l).abs() >= MIN_LIGHTNESS_DIFF && color.delta_e(bg) >= MIN_DELTA_E
}

// ─── Derived backgrounds ────────────────────────────────────────────────────

/// Derive an overlay background from the base background: lighten a dark
/// base by `raise`, darken a light base by `lower`. The pivot at L = 50
/// keeps the overlay visible in both theme polarities.
#[must_use]
pub fn overlay_background(base: LabColor, raise: f64, lower: f64) -> LabColor {
    if base.l < 50.0 {
        base.with_lightness((base.l + raise).min(100.0))
    } else {
        base.with_lightness((base.l - lower).max(0.0))
    }
}

/// Derive a code-block background: pinned near-black on dark themes,
/// noticeably darker than the base on light ones.
#[must_use]
pub fn code_background(base: LabColor) -> LabColor {
    if base.l < 50.0 {
        base.with_lightness(10.0)
    } else {
        base.with_lightness((base.l - 25.0).max(0.0))
    }
}

/// Pull a (fg, bg) pair a quarter of the way toward each other in
/// lightness. Used for gradient roles that bridge two differently-colored
/// columns.
#[must_use]
pub fn gradient_pair(fg: LabColor, bg: LabColor) -> (LabColor, LabColor) {
    let diff = fg.l - bg.l;
    (
        fg.with_lightness(fg.l - diff / 4.0),
        bg.with_lightness(bg.l + diff / 4.0),
    )
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: (u8, u8, u8) = (0, 0, 0);
    const WHITE: (u8, u8, u8) = (255, 255, 255);

    #[test]
    fn luminance_endpoints() {
        assert!(relative_luminance(BLACK) < 0.001);
        assert!((relative_luminance(WHITE) - 1.0).abs() < 0.001);
    }

    #[test]
    fn black_on_white_is_max_contrast() {
        let ratio = contrast_ratio(BLACK, WHITE);
        assert!((ratio - 21.0).abs() < 0.1, "ratio = {ratio}");
    }

    #[test]
    fn contrast_is_symmetric() {
        let a = (30, 144, 255);
        let b = (20, 20, 20);
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn sufficient_contrast_accepts_opposites() {
        let black = LabColor::from_rgb(0, 0, 0);
        let white = LabColor::from_rgb(255, 255, 255);
        assert!(sufficient_contrast(white, black));
        assert!(!sufficient_contrast(black, black));
    }

    #[test]
    fn near_shades_fail_contrast() {
        let a = LabColor::from_rgb(40, 40, 40);
        let b = LabColor::from_rgb(50, 50, 50);
        assert!(!sufficient_contrast(a, b));
    }

    #[test]
    fn overlay_lightens_dark_base() {
        let base = LabColor::from_rgb(20, 20, 20);
        let derived = overlay_background(base, 18.0, 15.0);
        assert!((derived.l - (base.l + 18.0)).abs() < 1e-9);
    }

    #[test]
    fn overlay_darkens_light_base() {
        let base = LabColor::from_rgb(240, 240, 240);
        let derived = overlay_background(base, 18.0, 15.0);
        assert!((derived.l - (base.l - 15.0)).abs() < 1e-9);
    }

    #[test]
    fn overlay_clamps_to_valid_lightness() {
        let bright = LabColor::new(95.0, 0.0, 0.0);
        assert!(overlay_background(bright, 18.0, 100.0).l >= 0.0);
        let dark = LabColor::new(2.0, 0.0, 0.0);
        assert!(overlay_background(dark, 200.0, 15.0).l <= 100.0);
    }

    #[test]
    fn code_background_polarity() {
        let dark = LabColor::new(18.0, 0.0, 0.0);
        assert!((code_background(dark).l - 10.0).abs() < 1e-9);
        let light = LabColor::new(96.0, 0.0, 0.0);
        assert!((code_background(light).l - 71.0).abs() < 1e-9);
    }

    #[test]
    fn gradient_pulls_quarter_way() {
        let fg = LabColor::new(80.0, 0.0, 0.0);
        let bg = LabColor::new(20.0, 0.0, 0.0);
        let (gfg, gbg) = gradient_pair(fg, bg);
        assert!((gfg.l - 65.0).abs() < 1e-9);
        assert!((gbg.l - 35.0).abs() < 1e-9);
    }
}
