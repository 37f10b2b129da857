// SPDX-License-Identifier: MIT
//
// ll-render — line expansion, attribute resolution, and mouse routing.
//
// The render pipeline for one log line:
//
//   raw bytes ──expand──▶ display buffer + offset adjustments
//        spans ──resolve──▶ per-cell attributes (+ selection text)
//              ──render──▶ cells placed through a Backend
//
// Alongside it, the viewport tree routes pointer events to the leaf view
// that owns them, with drag-lock so gestures stay bound to their origin.

pub mod expand;
pub mod line;
pub mod render;
pub mod resolve;
pub mod view;
