// SPDX-License-Identifier: MIT
//
// ThemeState — the fully resolved role table.
//
// Built once from a `ThemeDef` plus the backend's capabilities, then read
// by every render call. On theme change the whole thing is rebuilt and
// swapped in as a unit; nothing in here mutates after `build` returns, so
// readers can never observe a half-built table.
//
// Resolution order matters: plain rules first, then fallbacks from the
// built-in default theme, then derived roles (gradient, stitches, auto
// backgrounds) computed from already-resolved entries rather than from the
// raw definition.

use std::collections::HashMap;

use ll_term::backend::Capabilities;
use ll_term::cell::{Attr, TextAttrs};
use ll_term::color::{ColorUnit, LabColor};

use crate::contrast::{code_background, gradient_pair, overlay_background};
use crate::palette::{HI_COLOR_COUNT, Palette};
use crate::role::{IconId, Level, Role};
use crate::theme::{Reporter, StyleRule, ThemeDef, ThemeError, builtin_theme, default_theme};

// ─── RoleAttrs ──────────────────────────────────────────────────────────────

/// Concrete attributes for one role: the plain look and the reverse-video
/// look, resolved once at theme build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleAttrs {
    pub normal: TextAttrs,
    pub reverse: TextAttrs,
    /// Stable style-class name, when the theme rule declared one.
    pub class: Option<String>,
}

impl RoleAttrs {
    fn from_normal(normal: TextAttrs, class: Option<String>) -> Self {
        let mut reverse = normal;
        reverse.overlay(&TextAttrs::EMPTY.with_attrs(Attr::REVERSE));
        Self {
            normal,
            reverse,
            class,
        }
    }
}

/// What a style-class name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    Role(Role),
    Level(Level),
}

// ─── ThemeState ─────────────────────────────────────────────────────────────

/// The process-wide resolved theme. Read-only after build.
#[derive(Debug, Clone)]
pub struct ThemeState {
    name: String,
    caps: Capabilities,
    palette: Palette,
    roles: Vec<RoleAttrs>,
    levels: Vec<RoleAttrs>,
    highlights: [u8; HI_COLOR_COUNT],
    ansi_map: [ColorUnit; 8],
    icons: [Option<char>; IconId::COUNT],
    classes: HashMap<String, StyleTarget>,
}

impl ThemeState {
    /// Build from a named built-in theme, falling back to the default
    /// theme (with a reported error) when the name is unknown.
    pub fn from_name(name: &str, caps: Capabilities, report: &mut Reporter<'_>) -> Self {
        let def = builtin_theme(name).unwrap_or_else(|| {
            report(ThemeError::UnknownTheme(name.to_string()));
            default_theme()
        });
        Self::build(&def, caps, report)
    }

    /// Resolve an abstract theme into a complete attribute table.
    pub fn build(def: &ThemeDef, caps: Capabilities, report: &mut Reporter<'_>) -> Self {
        let palette = Palette::xterm(&caps);

        // Pass 1: every role's rule, as written.
        let mut roles: Vec<RoleAttrs> = Role::all()
            .map(|role| {
                let rule = def.rule(role);
                let ctx = format!("{}/{role:?}", def.name);
                let normal = resolve_rule(def, &rule, &ctx, report);
                RoleAttrs::from_normal(normal, rule.class)
            })
            .collect();

        // Pass 2: roles the active theme left unset fall back to the
        // built-in default theme.
        let fallback = default_theme();
        for role in [Role::SelectedText, Role::CursorLine, Role::DisabledCursorLine] {
            if roles[role.index()].normal.is_empty() {
                let rule = fallback.rule(role);
                let ctx = format!("default/{role:?}");
                let normal = resolve_rule(&fallback, &rule, &ctx, report);
                roles[role.index()] = RoleAttrs::from_normal(normal, rule.class);
            }
        }

        // The text background anchors all perceptual derivation. A
        // transparent text background means the terminal default, which is
        // what palette slot 0's Lab value tracks.
        let slot0_lab = palette.entry(0).map_or(LabColor::new(0.0, 0.0, 0.0), |e| e.lab);
        let text_bg = roles[Role::Text.index()]
            .normal
            .bg
            .to_lab()
            .unwrap_or(slot0_lab);

        // Pass 3: derived roles, computed from resolved entries.
        for (role, raise, lower) in [
            (Role::CursorLine, 18.0, 15.0),
            (Role::DisabledCursorLine, 18.0, 15.0),
            (Role::Popup, 30.0, 30.0),
        ] {
            let entry = &mut roles[role.index()];
            if entry.normal.bg.is_transparent() {
                let lab = overlay_background(text_bg, raise, lower);
                let (r, g, b) = lab.to_rgb();
                let normal = entry.normal.with_bg(ColorUnit::Rgb(r, g, b));
                *entry = RoleAttrs::from_normal(normal, entry.class.take());
            }
        }
        for role in [Role::InlineCode, Role::QuotedCode] {
            let entry = &mut roles[role.index()];
            if entry.normal.bg.is_transparent() {
                let (r, g, b) = code_background(text_bg).to_rgb();
                let normal = entry.normal.with_bg(ColorUnit::Rgb(r, g, b));
                *entry = RoleAttrs::from_normal(normal, entry.class.take());
            }
        }

        let time_bg = roles[Role::TimeColumn.index()]
            .normal
            .bg
            .to_lab()
            .unwrap_or(slot0_lab);
        let (gfg, gbg) = gradient_pair(time_bg, text_bg);
        let (fr, fg_, fb) = gfg.to_rgb();
        let (br, bg_, bb) = gbg.to_rgb();
        roles[Role::TimeColumnToText.index()] = RoleAttrs::from_normal(
            TextAttrs::EMPTY
                .with_fg(ColorUnit::Rgb(fr, fg_, fb))
                .with_bg(ColorUnit::Rgb(br, bg_, bb)),
            None,
        );

        // Stitch roles paint the seam glyph between two status segments:
        // the glyph takes the departing segment's background as its
        // foreground over the arriving segment's background.
        for (role, from, to) in [
            (Role::StatusStitchTitleToSub, Role::StatusTitle, Role::StatusSubtitle),
            (Role::StatusStitchSubToTitle, Role::StatusSubtitle, Role::StatusTitle),
            (Role::StatusStitchSubToNormal, Role::StatusSubtitle, Role::Status),
            (Role::StatusStitchNormalToSub, Role::Status, Role::StatusSubtitle),
            (Role::StatusStitchTitleToNormal, Role::StatusTitle, Role::Status),
            (Role::StatusStitchNormalToTitle, Role::Status, Role::StatusTitle),
        ] {
            let seam = TextAttrs::EMPTY
                .with_fg(roles[from.index()].normal.bg)
                .with_bg(roles[to.index()].normal.bg);
            roles[role.index()] = RoleAttrs::from_normal(seam, None);
        }

        // Severity levels resolve like roles; Unknown borrows Info's look.
        let mut levels: Vec<RoleAttrs> = Level::all()
            .map(|level| {
                let rule = def.level_styles.get(&level).cloned().unwrap_or_default();
                let ctx = format!("{}/level/{level:?}", def.name);
                let normal = resolve_rule(def, &rule, &ctx, report);
                RoleAttrs::from_normal(normal, rule.class)
            })
            .collect();
        levels[Level::Unknown.index()] = levels[Level::Info.index()].clone();

        let mut icons = [None; IconId::COUNT];
        for id in IconId::all() {
            let Some(glyph) = def.icons.get(&id) else {
                continue;
            };
            if glyph.is_empty() {
                continue;
            }
            let mut chars = glyph.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => icons[id.index()] = Some(c),
                _ => report(ThemeError::InvalidIcon {
                    value: glyph.clone(),
                    context: format!("{}/icons/{id:?}", def.name),
                }),
            }
        }

        let mut ansi_map = [ColorUnit::Transparent; 8];
        for (idx, spec) in def.ansi.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let identity = ColorUnit::Palette(idx as u8);
            if spec.is_empty() {
                ansi_map[idx] = identity;
                continue;
            }
            let ctx = format!("{}/ansi/{idx}", def.name);
            let resolved = def.resolve_color(spec, &ctx, report);
            ansi_map[idx] = if resolved.is_transparent() {
                identity
            } else {
                resolved
            };
        }

        let mut classes = HashMap::new();
        for (role, entry) in Role::all().zip(&roles) {
            if let Some(class) = &entry.class {
                classes.insert(class.clone(), StyleTarget::Role(role));
            }
        }
        for (level, entry) in Level::all().zip(&levels) {
            if let Some(class) = &entry.class {
                classes.insert(class.clone(), StyleTarget::Level(level));
            }
        }

        let highlights = palette.build_highlights(text_bg);

        Self {
            name: def.name.clone(),
            caps,
            palette,
            roles,
            levels,
            highlights,
            ansi_map,
            icons,
            classes,
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn caps(&self) -> Capabilities {
        self.caps
    }

    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    #[must_use]
    pub fn role_attrs(&self, role: Role) -> &RoleAttrs {
        &self.roles[role.index()]
    }

    /// Shorthand for a role's normal attributes.
    #[inline]
    #[must_use]
    pub fn attrs_for_role(&self, role: Role) -> TextAttrs {
        self.roles[role.index()].normal
    }

    #[inline]
    #[must_use]
    pub fn level_attrs(&self, level: Level) -> &RoleAttrs {
        &self.levels[level.index()]
    }

    /// The glyph and coloring role for an icon, when the theme defined it.
    #[must_use]
    pub fn icon(&self, id: IconId) -> Option<(char, Role)> {
        self.icons[id.index()].map(|c| (c, id.role()))
    }

    /// Out-of-band lookup from a stable style-class name.
    #[must_use]
    pub fn target_for_class(&self, class: &str) -> Option<StyleTarget> {
        self.classes.get(class).copied()
    }

    // ── Color operations ───────────────────────────────────────────────

    /// Reduce a color to something the backend can paint: RGB passes
    /// through on true-color terminals and otherwise matches to the
    /// nearest palette slot. Palette and unresolved units are unchanged.
    #[must_use]
    pub fn match_color(&self, color: ColorUnit) -> ColorUnit {
        match color {
            ColorUnit::Rgb(r, g, b) if !self.caps.rgb => {
                ColorUnit::Palette(self.palette.nearest(LabColor::from_rgb(r, g, b)))
            }
            other => other,
        }
    }

    /// A stable, readable color for an identifier string.
    ///
    /// Literal hex codes (`#xxx`, `#xxxxxx`) are honored directly; any
    /// other string hashes into the highlight table, so the same
    /// identifier gets the same color everywhere it appears.
    #[must_use]
    pub fn color_for_ident(&self, text: &str) -> ColorUnit {
        if text.starts_with('#') && (text.len() == 4 || text.len() == 7) {
            if let Some(color) = ColorUnit::from_hex(text) {
                return self.match_color(color);
            }
        }
        let mut hasher = crc32fast::Hasher::new_with_initial(1);
        hasher.update(text.as_bytes());
        let slot = hasher.finalize() as usize % HI_COLOR_COUNT;
        ColorUnit::Palette(self.highlights[slot])
    }

    /// Substitute the theme's configured equivalent for one of the 8
    /// standard ANSI colors. Everything else passes through.
    #[must_use]
    pub fn ansi_to_theme(&self, color: ColorUnit) -> ColorUnit {
        match color {
            ColorUnit::Palette(idx) if idx < 8 => self.ansi_map[usize::from(idx)],
            other => other,
        }
    }
}

// ─── Rule resolution ────────────────────────────────────────────────────────

fn resolve_rule(
    def: &ThemeDef,
    rule: &StyleRule,
    ctx: &str,
    report: &mut Reporter<'_>,
) -> TextAttrs {
    let mut attrs = Attr::empty();
    attrs.set(Attr::BOLD, rule.bold);
    attrs.set(Attr::ITALIC, rule.italic);
    attrs.set(Attr::UNDERLINE, rule.underline);
    attrs.set(Attr::STRUCK, rule.strikethrough);
    attrs.set(Attr::REVERSE, rule.reverse);

    let fg_ctx = format!("{ctx}/fg");
    let bg_ctx = format!("{ctx}/bg");
    TextAttrs {
        fg: def.resolve_color(&rule.fg, &fg_ctx, report),
        bg: def.resolve_color(&rule.bg, &bg_ctx, report),
        attrs,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::monochrome_theme;
    use pretty_assertions::assert_eq;

    fn build_default() -> ThemeState {
        let mut errors = Vec::new();
        let state = ThemeState::build(
            &default_theme(),
            Capabilities::TRUE_COLOR,
            &mut |e| errors.push(e),
        );
        assert_eq!(errors, Vec::new(), "default theme must build cleanly");
        state
    }

    // ── Build shape ────────────────────────────────────────────────────

    #[test]
    fn every_role_has_an_entry() {
        let state = build_default();
        for role in Role::all() {
            let _ = state.role_attrs(role);
        }
        assert_eq!(state.roles.len(), Role::COUNT);
        assert_eq!(state.levels.len(), Level::COUNT);
    }

    #[test]
    fn reverse_variant_carries_reverse_flag() {
        let state = build_default();
        let err = state.role_attrs(Role::Error);
        assert!(!err.normal.attrs.contains(Attr::REVERSE));
        assert!(err.reverse.attrs.contains(Attr::REVERSE));
        assert_eq!(err.normal.fg, err.reverse.fg);
    }

    #[test]
    fn reverse_of_reversed_role_cancels() {
        // Focused is authored with REVERSE; its reverse variant must not
        // stack a second inversion.
        let state = build_default();
        let focused = state.role_attrs(Role::Focused);
        assert!(focused.normal.attrs.contains(Attr::REVERSE));
        assert!(!focused.reverse.attrs.contains(Attr::REVERSE));
    }

    // ── Derived roles ──────────────────────────────────────────────────

    #[test]
    fn stitch_fg_is_departing_segment_bg() {
        let state = build_default();
        let seam = state.role_attrs(Role::StatusStitchTitleToSub);
        assert_eq!(seam.normal.fg, state.attrs_for_role(Role::StatusTitle).bg);
        assert_eq!(seam.normal.bg, state.attrs_for_role(Role::StatusSubtitle).bg);
    }

    #[test]
    fn gradient_lightness_sits_between_sources() {
        let state = build_default();
        let grad = state.role_attrs(Role::TimeColumnToText).normal;
        let text_bg = state.attrs_for_role(Role::Text).bg.to_lab().unwrap();
        let time_bg = state.attrs_for_role(Role::TimeColumn).bg.to_lab().unwrap();
        let gfg = grad.fg.to_lab().unwrap();
        let (lo, hi) = if time_bg.l < text_bg.l {
            (time_bg.l, text_bg.l)
        } else {
            (text_bg.l, time_bg.l)
        };
        assert!(gfg.l >= lo - 0.5 && gfg.l <= hi + 0.5, "fg.l = {}", gfg.l);
    }

    #[test]
    fn popup_background_is_derived_when_unset() {
        let state = build_default();
        let popup = state.attrs_for_role(Role::Popup);
        assert!(!popup.bg.is_transparent());
        let text_bg = state.attrs_for_role(Role::Text).bg.to_lab().unwrap();
        let popup_bg = popup.bg.to_lab().unwrap();
        // Dark default theme: the popup surfaces 30 L above the base.
        assert!((popup_bg.l - (text_bg.l + 30.0)).abs() < 1.5);
    }

    #[test]
    fn code_backgrounds_are_derived_when_unset() {
        let state = build_default();
        for role in [Role::InlineCode, Role::QuotedCode] {
            assert!(
                !state.attrs_for_role(role).bg.is_transparent(),
                "{role:?} should have a derived background"
            );
        }
    }

    #[test]
    fn unset_roles_fall_back_to_default_theme() {
        // monochrome leaves DisabledCursorLine unset.
        let mut errors = Vec::new();
        let state = ThemeState::build(
            &monochrome_theme(),
            Capabilities::TRUE_COLOR,
            &mut |e| errors.push(e),
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(!state.role_attrs(Role::DisabledCursorLine).normal.is_empty());
    }

    // ── Levels ─────────────────────────────────────────────────────────

    #[test]
    fn unknown_level_styled_as_info() {
        let state = build_default();
        assert_eq!(
            state.level_attrs(Level::Unknown),
            state.level_attrs(Level::Info)
        );
    }

    #[test]
    fn fatal_level_has_background() {
        let state = build_default();
        assert!(!state.level_attrs(Level::Fatal).normal.bg.is_transparent());
    }

    // ── Icons ──────────────────────────────────────────────────────────

    #[test]
    fn icons_decode_to_single_glyphs() {
        let state = build_default();
        let (glyph, role) = state.icon(IconId::Warning).unwrap();
        assert_eq!(glyph, '\u{26a0}');
        assert_eq!(role, Role::Warning);
    }

    #[test]
    fn multi_char_icon_is_reported_not_fatal() {
        let mut def = default_theme();
        def.icons.insert(IconId::Ok, "ok!".to_string());
        let mut errors = Vec::new();
        let state = ThemeState::build(&def, Capabilities::TRUE_COLOR, &mut |e| errors.push(e));
        assert!(state.icon(IconId::Ok).is_none());
        assert!(
            errors.iter().any(|e| matches!(e, ThemeError::InvalidIcon { .. })),
            "{errors:?}"
        );
    }

    // ── ANSI remap ─────────────────────────────────────────────────────

    #[test]
    fn ansi_map_defaults_to_identity() {
        let state = build_default();
        for idx in 0..8u8 {
            assert_eq!(
                state.ansi_to_theme(ColorUnit::Palette(idx)),
                ColorUnit::Palette(idx)
            );
        }
    }

    #[test]
    fn ansi_map_substitutes_configured_colors() {
        let mut def = default_theme();
        def.ansi[1] = "$red".to_string();
        let mut report = |_| {};
        let state = ThemeState::build(&def, Capabilities::TRUE_COLOR, &mut report);
        assert_eq!(
            state.ansi_to_theme(ColorUnit::Palette(1)),
            ColorUnit::Rgb(0xff, 0x61, 0x88)
        );
        // Non-ANSI values pass through.
        assert_eq!(
            state.ansi_to_theme(ColorUnit::Palette(42)),
            ColorUnit::Palette(42)
        );
        assert_eq!(
            state.ansi_to_theme(ColorUnit::Rgb(1, 2, 3)),
            ColorUnit::Rgb(1, 2, 3)
        );
    }

    // ── Identifier colors ──────────────────────────────────────────────

    #[test]
    fn ident_color_is_stable() {
        let state = build_default();
        assert_eq!(
            state.color_for_ident("com.example.Service"),
            state.color_for_ident("com.example.Service")
        );
    }

    #[test]
    fn ident_hex_literal_is_parsed_directly() {
        let state = build_default();
        assert_eq!(state.color_for_ident("#abc"), ColorUnit::Rgb(0xaa, 0xbb, 0xcc));
        assert_eq!(
            state.color_for_ident("#102030"),
            ColorUnit::Rgb(0x10, 0x20, 0x30)
        );
        // Hash-prefixed but not a valid literal: falls through to hashing.
        assert!(matches!(
            state.color_for_ident("#notahex"),
            ColorUnit::Palette(_)
        ));
    }

    #[test]
    fn distinct_idents_usually_differ() {
        let state = build_default();
        let slots: std::collections::HashSet<_> = ["alpha", "beta", "gamma", "delta", "epsilon"]
            .iter()
            .map(|s| format!("{:?}", state.color_for_ident(s)))
            .collect();
        assert!(slots.len() > 1, "all identifiers hashed to one slot");
    }

    // ── match_color ────────────────────────────────────────────────────

    #[test]
    fn match_color_passes_rgb_on_truecolor() {
        let state = build_default();
        let c = ColorUnit::Rgb(17, 34, 51);
        assert_eq!(state.match_color(c), c);
    }

    #[test]
    fn match_color_reduces_rgb_on_palette_terminals() {
        let mut report = |_| {};
        let state = ThemeState::build(
            &default_theme(),
            Capabilities::PALETTE_256,
            &mut report,
        );
        let matched = state.match_color(ColorUnit::Rgb(255, 0, 0));
        assert_eq!(matched, ColorUnit::Palette(9));
        assert_eq!(matched, state.match_color(ColorUnit::Rgb(255, 0, 0)));
        // Palette inputs pass through untouched.
        assert_eq!(
            state.match_color(ColorUnit::Palette(100)),
            ColorUnit::Palette(100)
        );
    }

    // ── Classes and theme lookup ───────────────────────────────────────

    #[test]
    fn class_index_maps_back_to_targets() {
        let state = build_default();
        assert_eq!(
            state.target_for_class("keyword"),
            Some(StyleTarget::Role(Role::Keyword))
        );
        assert_eq!(state.target_for_class("nope"), None);
    }

    #[test]
    fn unknown_theme_name_reports_and_falls_back() {
        let mut errors = Vec::new();
        let state =
            ThemeState::from_name("sunburst", Capabilities::TRUE_COLOR, &mut |e| errors.push(e));
        assert_eq!(state.name(), "default");
        assert!(matches!(errors[0], ThemeError::UnknownTheme(_)));
    }
}
