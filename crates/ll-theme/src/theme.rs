// SPDX-License-Identifier: MIT
//
// Theme definitions — the abstract input the role table is built from.
//
// A `ThemeDef` is what a config loader would hand us: style rules keyed by
// role, named variable colors, icon glyph strings, and per-level rules.
// Nothing here is terminal-aware; resolution against a palette and
// capabilities happens in `state`.
//
// Errors in a definition are recoverable by design: they go to a report
// callback with enough context to point at the offending rule, and the
// affected value degrades to something inert.

use std::collections::HashMap;

use ll_term::color::ColorUnit;
use thiserror::Error;

use crate::role::{IconId, Level, Role};

/// Variable references may chain (`$a` → `$b` → `#fff`); cycles stop here.
const MAX_VAR_DEPTH: usize = 4;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// A recoverable problem in a theme definition.
///
/// `context` names the rule the value came from (e.g. `default/error/fg`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("{context}: invalid color {value:?}")]
    InvalidColor { value: String, context: String },

    #[error("{context}: undefined variable ${name}")]
    UnknownVariable { name: String, context: String },

    #[error("{context}: icon must be a single character, got {value:?}")]
    InvalidIcon { value: String, context: String },

    #[error("unknown theme {0:?}")]
    UnknownTheme(String),
}

/// Callback for recoverable theme errors. Invoked zero or more times
/// during a build; the build always completes.
pub type Reporter<'a> = dyn FnMut(ThemeError) + 'a;

// ─── Style rules ────────────────────────────────────────────────────────────

/// One role's (or level's) style as authored in the theme.
///
/// Color strings support `#rgb`/`#rrggbb` hex, `$variable` references, the
/// 16 ANSI color names, bare palette indices, `semantic`, and empty
/// (= transparent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRule {
    pub fg: String,
    pub bg: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub reverse: bool,
    /// Stable style-class name for out-of-band lookup (e.g. from markup).
    pub class: Option<String>,
}

impl StyleRule {
    #[must_use]
    pub fn fg(mut self, fg: &str) -> Self {
        self.fg = fg.to_string();
        self
    }

    #[must_use]
    pub fn bg(mut self, bg: &str) -> Self {
        self.bg = bg.to_string();
        self
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    #[must_use]
    pub const fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    #[must_use]
    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    #[must_use]
    pub fn class(mut self, name: &str) -> Self {
        self.class = Some(name.to_string());
        self
    }

    /// True when the rule says nothing at all (unset in the theme).
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.fg.is_empty()
            && self.bg.is_empty()
            && !self.bold
            && !self.italic
            && !self.underline
            && !self.strikethrough
            && !self.reverse
    }
}

// ─── Theme definition ───────────────────────────────────────────────────────

/// An abstract theme: everything a config loader provides.
#[derive(Debug, Clone, Default)]
pub struct ThemeDef {
    pub name: String,
    /// Named colors referenced from rules as `$name`.
    pub vars: HashMap<String, String>,
    pub styles: HashMap<Role, StyleRule>,
    pub level_styles: HashMap<Level, StyleRule>,
    /// Icon glyphs; each value must decode to a single code point.
    pub icons: HashMap<IconId, String>,
    /// Remaps for the 8 standard ANSI colors; empty = identity.
    pub ansi: [String; 8],
}

impl ThemeDef {
    #[must_use]
    pub fn rule(&self, role: Role) -> StyleRule {
        self.styles.get(&role).cloned().unwrap_or_default()
    }

    /// Resolve one color string from this theme into a `ColorUnit`,
    /// reporting (and degrading to transparent) anything malformed.
    pub fn resolve_color(&self, spec: &str, context: &str, report: &mut Reporter<'_>) -> ColorUnit {
        let mut current = spec.to_string();
        for _ in 0..MAX_VAR_DEPTH {
            if let Some(name) = current.strip_prefix('$') {
                match self.vars.get(name) {
                    Some(value) => current = value.clone(),
                    None => {
                        report(ThemeError::UnknownVariable {
                            name: name.to_string(),
                            context: context.to_string(),
                        });
                        return ColorUnit::Transparent;
                    }
                }
            } else {
                return resolve_literal(&current, context, report);
            }
        }
        report(ThemeError::InvalidColor {
            value: spec.to_string(),
            context: context.to_string(),
        });
        ColorUnit::Transparent
    }
}

fn resolve_literal(spec: &str, context: &str, report: &mut Reporter<'_>) -> ColorUnit {
    if spec.is_empty() {
        return ColorUnit::Transparent;
    }
    if spec == "semantic" {
        return ColorUnit::Semantic;
    }
    if spec.starts_with('#') {
        return ColorUnit::from_hex(spec).unwrap_or_else(|| {
            report(ThemeError::InvalidColor {
                value: spec.to_string(),
                context: context.to_string(),
            });
            ColorUnit::Transparent
        });
    }
    if let Some(idx) = ansi_name_index(spec) {
        return ColorUnit::Palette(idx);
    }
    if let Ok(idx) = spec.parse::<u8>() {
        return ColorUnit::Palette(idx);
    }
    report(ThemeError::InvalidColor {
        value: spec.to_string(),
        context: context.to_string(),
    });
    ColorUnit::Transparent
}

fn ansi_name_index(name: &str) -> Option<u8> {
    const NAMES: [&str; 8] = [
        "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
    ];
    if let Some(base) = name.strip_prefix("bright-") {
        return NAMES.iter().position(|&n| n == base).map(|i| {
            #[allow(clippy::cast_possible_truncation)]
            {
                i as u8 + 8
            }
        });
    }
    NAMES.iter().position(|&n| n == name).map(|i| {
        #[allow(clippy::cast_possible_truncation)]
        {
            i as u8
        }
    })
}

// ─── Built-in themes ────────────────────────────────────────────────────────

/// Look up a built-in theme by name. Returns `None` if unrecognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<ThemeDef> {
    match name {
        "default" => Some(default_theme()),
        "monochrome" => Some(monochrome_theme()),
        _ => None,
    }
}

/// All built-in theme names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["default", "monochrome"]
}

/// The built-in dark theme. Also the fallback source for roles other
/// themes leave unset.
#[must_use]
pub fn default_theme() -> ThemeDef {
    let mut def = ThemeDef {
        name: "default".to_string(),
        ..ThemeDef::default()
    };
    for (name, value) in [
        ("bg", "#2d2a2e"),
        ("fg", "#fcfcfa"),
        ("comment", "#727072"),
        ("red", "#ff6188"),
        ("orange", "#fc9867"),
        ("yellow", "#ffd866"),
        ("green", "#a9dc76"),
        ("cyan", "#78dce8"),
        ("blue", "#78a9ff"),
        ("magenta", "#ab9df2"),
    ] {
        def.vars.insert(name.to_string(), value.to_string());
    }

    let rule = StyleRule::default;
    let styles = [
        (Role::Text, rule().fg("$fg").bg("$bg")),
        (Role::Identifier, rule().fg("semantic")),
        (Role::SearchMatch, rule().fg("$yellow").reverse().class("search")),
        (Role::Ok, rule().fg("$green").bold()),
        (Role::Info, rule().fg("$magenta").bold().class("info")),
        (Role::Error, rule().fg("$red").bold().class("error")),
        (Role::Warning, rule().fg("$yellow").bold().class("warning")),
        (Role::AltRow, rule().fg("$fg").bg("#36333a")),
        (Role::Hidden, rule().fg("$yellow")),
        (Role::CursorLine, rule().fg("$fg").bg("#403e41").bold()),
        (Role::DisabledCursorLine, rule().bg("#37343a")),
        (Role::AdjustedTime, rule().fg("$magenta")),
        (Role::SkewedTime, rule().fg("$yellow")),
        (Role::OffsetTime, rule().fg("$cyan")),
        (Role::TimeColumn, rule().fg("$fg").bg("#221f22")),
        (Role::FileOffset, rule().fg("#8f8a91")),
        (Role::InvalidMsg, rule().fg("$yellow")),
        (Role::SelectedText, rule().fg("$fg").bg("#5b595c")),
        (Role::FuzzyMatch, rule().fg("$magenta").bold().underline()),
        (Role::Suggestion, rule().fg("#8f8a91")),
        (Role::Status, rule().fg("$fg").bg("#403e41")),
        (Role::WarnStatus, rule().fg("$yellow").bg("#403e41")),
        (Role::AlertStatus, rule().fg("$red").bg("#403e41")),
        (Role::ActiveStatus, rule().fg("$green").bg("#403e41")),
        (Role::ActiveStatus2, rule().fg("$green").bg("#403e41").bold()),
        (Role::StatusTitle, rule().fg("$bg").bg("$magenta").bold()),
        (Role::StatusSubtitle, rule().fg("$bg").bg("$cyan")),
        (Role::StatusInfo, rule().fg("$fg").bg("#403e41")),
        (Role::StatusTitleHotkey, rule().fg("$cyan").bg("#403e41").underline()),
        (Role::StatusDisabledTitle, rule().fg("#727072").bg("#403e41")),
        (Role::StatusHotkey, rule().fg("$cyan").bg("#403e41").underline()),
        (Role::InactiveStatus, rule().fg("#8f8a91").bg("#221f22")),
        (Role::InactiveAlertStatus, rule().fg("$red").bg("#221f22")),
        (Role::Scrollbar, rule().fg("#403e41").bg("#727072")),
        (Role::ScrollbarError, rule().fg("$red").bg("#727072")),
        (Role::ScrollbarWarning, rule().fg("$yellow").bg("#727072")),
        (Role::Focused, rule().reverse()),
        (Role::DisabledFocused, rule().fg("#727072").reverse()),
        (Role::Popup, rule().fg("$fg")),
        (Role::PopupBorder, rule().fg("#727072")),
        (Role::ColorHint, rule().fg("$magenta")),
        (Role::Breadcrumb, rule().fg("#8f8a91")),
        (Role::Keyword, rule().fg("$red").class("keyword")),
        (Role::String, rule().fg("$yellow").class("string")),
        (Role::Comment, rule().fg("$comment").italic().class("comment")),
        (Role::DocDirective, rule().fg("$cyan")),
        (Role::Variable, rule().fg("$fg").class("variable")),
        (Role::Symbol, rule().fg("$orange")),
        (Role::Number, rule().fg("$magenta").class("number")),
        (Role::Null, rule().fg("#8f8a91")),
        (Role::AsciiControl, rule().fg("$green")),
        (Role::NonAscii, rule().fg("$yellow")),
        (Role::ReSpecial, rule().fg("$cyan")),
        (Role::ReRepeat, rule().fg("$yellow")),
        (Role::File, rule().fg("$blue")),
        (Role::Function, rule().fg("$green").class("function")),
        (Role::Type, rule().fg("$cyan").class("type")),
        (Role::Separator, rule().fg("#8f8a91")),
        (Role::H1, rule().fg("$magenta").bold()),
        (Role::H2, rule().fg("$magenta").underline()),
        (Role::H3, rule().fg("$magenta")),
        (Role::H4, rule().fg("$fg").bold().underline()),
        (Role::H5, rule().fg("$fg").underline()),
        (Role::H6, rule().fg("$fg").underline()),
        (Role::ListGlyph, rule().fg("$yellow")),
        (Role::TableBorder, rule().fg("#727072")),
        (Role::TableHeader, rule().fg("$fg").bold()),
        (Role::QuoteBorder, rule().fg("#727072").bg("#221f22")),
        (Role::QuotedText, rule().fg("#8f8a91")),
        (Role::FootnoteBorder, rule().fg("$blue")),
        (Role::FootnoteText, rule().fg("#8f8a91")),
        (Role::SnippetBorder, rule().fg("$cyan")),
        (Role::IndentGuide, rule().fg("#403e41")),
        (Role::CodeBorder, rule().fg("#727072")),
        (Role::DiffDelete, rule().fg("$red").class("diff-delete")),
        (Role::DiffAdd, rule().fg("$green").class("diff-add")),
        (Role::DiffSection, rule().fg("$magenta").class("diff-section")),
        (Role::LowThreshold, rule().bg("$green")),
        (Role::MedThreshold, rule().bg("$yellow")),
        (Role::HighThreshold, rule().bg("$red")),
    ];
    def.styles.extend(styles);

    let levels = [
        (Level::Trace, rule().fg("#727072")),
        (Level::Debug, rule().fg("#8f8a91")),
        (Level::Info, rule()),
        (Level::Stats, rule().fg("$magenta")),
        (Level::Notice, rule().fg("$cyan")),
        (Level::Warning, rule().fg("$yellow").class("warning")),
        (Level::Error, rule().fg("$red").class("error")),
        (Level::Critical, rule().fg("$red").bold()),
        (Level::Fatal, rule().fg("$bg").bg("$red").bold()),
    ];
    def.level_styles.extend(levels);

    let icons = [
        (IconId::Hidden, "\u{22ef}"),      // ⋯
        (IconId::Ok, "\u{2714}"),          // ✔
        (IconId::Info, "\u{24d8}"),        // ⓘ
        (IconId::Warning, "\u{26a0}"),     // ⚠
        (IconId::Error, "\u{2716}"),       // ✖
        (IconId::LevelTrace, "\u{2219}"),  // ∙
        (IconId::LevelDebug, "\u{2699}"),  // ⚙
        (IconId::LevelInfo, "\u{2139}"),   // ℹ
        (IconId::LevelStats, "\u{2211}"),  // ∑
        (IconId::LevelNotice, "\u{2691}"), // ⚑
        (IconId::LevelWarning, "\u{26a0}"),
        (IconId::LevelError, "\u{2718}"),  // ✘
        (IconId::LevelCritical, "\u{2620}"), // ☠
        (IconId::LevelFatal, "\u{1f480}"), // 💀
        (IconId::Play, "\u{25b6}"),        // ▶
        (IconId::Stop, "\u{25a0}"),        // ■
    ];
    for (id, glyph) in icons {
        def.icons.insert(id, glyph.to_string());
    }

    def
}

/// A flat grayscale theme, useful on limited terminals.
#[must_use]
pub fn monochrome_theme() -> ThemeDef {
    let mut def = ThemeDef {
        name: "monochrome".to_string(),
        ..ThemeDef::default()
    };
    let rule = StyleRule::default;
    let styles = [
        (Role::Text, rule().fg("white")),
        (Role::SearchMatch, rule().reverse()),
        (Role::Ok, rule().fg("bright-white").bold()),
        (Role::Info, rule().fg("white")),
        (Role::Error, rule().fg("bright-white").bold().reverse().class("error")),
        (Role::Warning, rule().fg("bright-white").bold().class("warning")),
        (Role::CursorLine, rule().reverse()),
        (Role::SelectedText, rule().reverse()),
        (Role::Status, rule().reverse()),
        (Role::StatusTitle, rule().reverse().bold()),
        (Role::Comment, rule().fg("bright-black").italic()),
    ];
    def.styles.extend(styles);
    def
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(def: &ThemeDef, spec: &str) -> (ColorUnit, Vec<ThemeError>) {
        let mut errors = Vec::new();
        let unit = def.resolve_color(spec, "test/fg", &mut |e| errors.push(e));
        (unit, errors)
    }

    #[test]
    fn empty_is_transparent() {
        let (unit, errors) = resolve(&ThemeDef::default(), "");
        assert_eq!(unit, ColorUnit::Transparent);
        assert!(errors.is_empty());
    }

    #[test]
    fn hex_and_names_and_indices() {
        let def = ThemeDef::default();
        assert_eq!(resolve(&def, "#ff0000").0, ColorUnit::Rgb(255, 0, 0));
        assert_eq!(resolve(&def, "red").0, ColorUnit::Palette(1));
        assert_eq!(resolve(&def, "bright-cyan").0, ColorUnit::Palette(14));
        assert_eq!(resolve(&def, "42").0, ColorUnit::Palette(42));
        assert_eq!(resolve(&def, "semantic").0, ColorUnit::Semantic);
    }

    #[test]
    fn variables_resolve_through_chains() {
        let mut def = ThemeDef::default();
        def.vars.insert("a".to_string(), "$b".to_string());
        def.vars.insert("b".to_string(), "#00ff00".to_string());
        let (unit, errors) = resolve(&def, "$a");
        assert_eq!(unit, ColorUnit::Rgb(0, 255, 0));
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_variable_is_reported() {
        let (unit, errors) = resolve(&ThemeDef::default(), "$nope");
        assert_eq!(unit, ColorUnit::Transparent);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ThemeError::UnknownVariable { .. }));
    }

    #[test]
    fn variable_cycle_is_reported() {
        let mut def = ThemeDef::default();
        def.vars.insert("a".to_string(), "$b".to_string());
        def.vars.insert("b".to_string(), "$a".to_string());
        let (unit, errors) = resolve(&def, "$a");
        assert_eq!(unit, ColorUnit::Transparent);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn garbage_color_is_reported() {
        let (unit, errors) = resolve(&ThemeDef::default(), "not-a-color");
        assert_eq!(unit, ColorUnit::Transparent);
        assert!(matches!(errors[0], ThemeError::InvalidColor { .. }));
    }

    #[test]
    fn unset_rule_detection() {
        assert!(StyleRule::default().is_unset());
        assert!(!StyleRule::default().bold().is_unset());
        assert!(!StyleRule::default().fg("red").is_unset());
        // A class alone doesn't make a rule "set".
        assert!(StyleRule::default().class("x").is_unset());
    }

    #[test]
    fn builtins_resolve() {
        for name in builtin_names() {
            assert!(builtin_theme(name).is_some(), "builtin {name} missing");
        }
        assert!(builtin_theme("nonexistent").is_none());
    }

    #[test]
    fn default_theme_colors_are_well_formed() {
        let def = default_theme();
        let mut errors = Vec::new();
        let mut report = |e: ThemeError| errors.push(e);
        for (role, rule) in &def.styles {
            def.resolve_color(&rule.fg, &format!("default/{role:?}/fg"), &mut report);
            def.resolve_color(&rule.bg, &format!("default/{role:?}/bg"), &mut report);
        }
        assert_eq!(errors, Vec::new());
    }
}
