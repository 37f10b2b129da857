// SPDX-License-Identifier: MIT
//
// ll-term — terminal-facing primitives for the loglook renderer.
//
// This crate holds everything the rendering engine needs to talk about a
// character-cell display without owning one: the cell/attribute model, the
// color model (semantic color units plus perceptual Lab math), the contract
// a terminal backend must satisfy, SGR mouse-event decoding, line ranges,
// and the liveness watchdog timer.
//
// The actual terminal — raw mode, escape output, capability detection — is
// deliberately someone else's problem. ll-term specifies what a backend
// must provide (`backend::Backend`) and ships an in-memory implementation
// for tests and headless use.

pub mod backend;
pub mod cell;
pub mod color;
pub mod input;
pub mod range;
pub mod timer;
