// SPDX-License-Identifier: MIT
//
// ll-theme — role and palette resolution for the loglook renderer.
//
// An abstract theme (named style rules per role, variable colors, icon
// glyphs) goes in; a fully concrete, capability-aware attribute table
// comes out:
//
//   ThemeDef ──build──▶ ThemeState
//      │                   ├─ Role    → RoleAttrs (normal / reverse)
//      │                   ├─ Level   → RoleAttrs
//      │                   ├─ ANSI remap, icon glyphs, class index
//      │                   └─ palette + highlight table (Lab-matched)
//      └─ recoverable errors ──▶ report callback, never a panic
//
// `ThemeState` is rebuilt wholesale on theme change and handed to render
// calls by reference; it is never mutated after build.

pub mod contrast;
pub mod palette;
pub mod role;
pub mod state;
pub mod theme;
