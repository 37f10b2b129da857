// SPDX-License-Identifier: MIT
//
// Mouse input — SGR sequence decoding and pointer-event classification.
//
// Turns raw SGR mouse reports (`ESC [ < Cb ; Cx ; Cy M|m`) into structured
// `MouseEvent`s carrying both the current position and the position where
// the active button was pressed. The press origin is what makes click and
// drag classification a pure function over a single event.
//
// Coordinates are signed: events get translated into view-local space as
// they descend the viewport tree, and a drag can legitimately sit at a
// negative local offset while the drag lock still owns it.

use std::time::{Duration, Instant};

use crate::range::LineRange;

/// Presses at the same cell within this window count as a double click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

// ─── Event types ────────────────────────────────────────────────────────────

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
}

/// The state transition a mouse event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseState {
    Pressed,
    Released,
    Dragged,
    DoubleClick,
}

/// One pointer event, in some view's coordinate space.
///
/// `press_x`/`press_y` are where the current button went down, carried on
/// every subsequent event of the gesture so consumers can classify clicks
/// and drags without their own bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: MouseButton,
    pub state: MouseState,
    pub x: i32,
    pub y: i32,
    pub press_x: i32,
    pub press_y: i32,
}

impl MouseEvent {
    /// A click: the button released at the exact cell it was pressed.
    #[must_use]
    pub fn is_click(&self, button: MouseButton) -> bool {
        self.button == button
            && self.state == MouseState::Released
            && self.x == self.press_x
            && self.y == self.press_y
    }

    /// A click where press and release only have to stay within a column
    /// range on the same row.
    #[must_use]
    pub fn is_click_in(&self, button: MouseButton, lr: LineRange) -> bool {
        self.button == button
            && self.state == MouseState::Released
            && self.y == self.press_y
            && contains_col(lr, self.press_x)
            && contains_col(lr, self.x)
    }

    /// The button went down inside the column range.
    #[must_use]
    pub fn is_press_in(&self, button: MouseButton, lr: LineRange) -> bool {
        self.button == button && self.state == MouseState::Pressed && contains_col(lr, self.x)
    }

    /// An ongoing drag whose press origin and current position both sit
    /// inside the column range.
    #[must_use]
    pub fn is_drag_in(&self, button: MouseButton, lr: LineRange) -> bool {
        self.button == button
            && self.state == MouseState::Dragged
            && contains_col(lr, self.press_x)
            && contains_col(lr, self.x)
    }

    /// A double click inside the column range.
    #[must_use]
    pub fn is_double_click_in(&self, button: MouseButton, lr: LineRange) -> bool {
        self.button == button && self.state == MouseState::DoubleClick && contains_col(lr, self.x)
    }

    /// The same event translated by `(dx, dy)`. Both the position and the
    /// press origin move, so drag deltas stay consistent across spaces.
    #[must_use]
    pub const fn translated(mut self, dx: i32, dy: i32) -> Self {
        self.x += dx;
        self.y += dy;
        self.press_x += dx;
        self.press_y += dy;
        self
    }
}

fn contains_col(lr: LineRange, x: i32) -> bool {
    usize::try_from(x).is_ok_and(|x| lr.contains(x))
}

// ─── SGR decoding ───────────────────────────────────────────────────────────

/// A raw SGR mouse report, before press-origin tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SgrReport {
    pub cb: u16,
    /// Zero-based column.
    pub x: i32,
    /// Zero-based row.
    pub y: i32,
    /// True for the `m` (release) terminator.
    pub release: bool,
}

/// Decode one complete SGR mouse sequence: `ESC [ < Cb ; Cx ; Cy (M|m)`.
///
/// Returns the report and the number of bytes consumed, or `None` if the
/// buffer does not start with a complete, well-formed sequence.
#[must_use]
pub fn decode_sgr(buf: &[u8]) -> Option<(SgrReport, usize)> {
    let rest = buf.strip_prefix(b"\x1b[<")?;
    let term = rest.iter().position(|&b| b == b'M' || b == b'm')?;
    let release = rest[term] == b'm';

    let mut params = [0u16; 3];
    let mut count = 0;
    for part in rest[..term].split(|&b| b == b';') {
        if count == 3 || part.is_empty() {
            return None;
        }
        let mut v: u16 = 0;
        for &b in part {
            if !b.is_ascii_digit() {
                return None;
            }
            v = v.checked_mul(10)?.checked_add(u16::from(b - b'0'))?;
        }
        params[count] = v;
        count += 1;
    }
    if count != 3 {
        return None;
    }

    Some((
        SgrReport {
            cb: params[0],
            x: i32::from(params[1]) - 1,
            y: i32::from(params[2]) - 1,
            release,
        },
        3 + term + 1,
    ))
}

const fn decode_button(base: u16) -> MouseButton {
    match base {
        0 => MouseButton::Left,
        1 => MouseButton::Middle,
        _ => MouseButton::Right,
    }
}

// ─── Press-origin tracking ──────────────────────────────────────────────────

/// Stamps press origins onto raw reports and detects double clicks.
///
/// One tracker per input stream. Scroll reports pass through with the
/// current position doubling as the press origin.
#[derive(Debug, Default)]
pub struct ButtonTracker {
    press: Option<(MouseButton, i32, i32)>,
    last_press: Option<(i32, i32, Instant)>,
}

impl ButtonTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a raw report into a tracked event.
    pub fn track(&mut self, report: SgrReport) -> MouseEvent {
        self.track_at(report, Instant::now())
    }

    fn track_at(&mut self, report: SgrReport, now: Instant) -> MouseEvent {
        let base = report.cb & 0b11;

        if report.cb & 64 != 0 {
            // Scroll wheel: stateless, no press origin to track.
            let button = if base == 0 {
                MouseButton::ScrollUp
            } else {
                MouseButton::ScrollDown
            };
            return MouseEvent {
                button,
                state: MouseState::Pressed,
                x: report.x,
                y: report.y,
                press_x: report.x,
                press_y: report.y,
            };
        }

        if report.cb & 32 != 0 {
            // Motion with a button held: a drag bound to the active press.
            let button = decode_button(base);
            let (press_x, press_y) = match self.press {
                Some((b, px, py)) if b == button => (px, py),
                _ => (report.x, report.y),
            };
            return MouseEvent {
                button,
                state: MouseState::Dragged,
                x: report.x,
                y: report.y,
                press_x,
                press_y,
            };
        }

        let button = decode_button(base);
        if report.release {
            let (press_x, press_y) = match self.press.take() {
                Some((b, px, py)) if b == button => (px, py),
                _ => (report.x, report.y),
            };
            return MouseEvent {
                button,
                state: MouseState::Released,
                x: report.x,
                y: report.y,
                press_x,
                press_y,
            };
        }

        let state = match self.last_press {
            Some((px, py, at))
                if px == report.x
                    && py == report.y
                    && now.duration_since(at) <= DOUBLE_CLICK_WINDOW =>
            {
                MouseState::DoubleClick
            }
            _ => MouseState::Pressed,
        };
        self.press = Some((button, report.x, report.y));
        self.last_press = Some((report.x, report.y, now));
        MouseEvent {
            button,
            state,
            x: report.x,
            y: report.y,
            press_x: report.x,
            press_y: report.y,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ev(state: MouseState, x: i32, y: i32, px: i32, py: i32) -> MouseEvent {
        MouseEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            press_x: px,
            press_y: py,
        }
    }

    // ── Classification ─────────────────────────────────────────────────

    #[test]
    fn click_requires_same_cell() {
        let e = ev(MouseState::Released, 3, 1, 3, 1);
        assert!(e.is_click(MouseButton::Left));
        assert!(!e.is_click(MouseButton::Right));

        let moved = ev(MouseState::Released, 4, 1, 3, 1);
        assert!(!moved.is_click(MouseButton::Left));
    }

    #[test]
    fn click_in_allows_horizontal_slack() {
        let lr = LineRange::new(2, 6);
        let e = ev(MouseState::Released, 5, 1, 3, 1);
        assert!(e.is_click_in(MouseButton::Left, lr));

        // Release outside the range.
        let out = ev(MouseState::Released, 6, 1, 3, 1);
        assert!(!out.is_click_in(MouseButton::Left, lr));

        // Row changed.
        let off_row = ev(MouseState::Released, 5, 2, 3, 1);
        assert!(!off_row.is_click_in(MouseButton::Left, lr));
    }

    #[test]
    fn drag_in_checks_origin_and_position() {
        let lr = LineRange::new(0, 10);
        assert!(ev(MouseState::Dragged, 4, 0, 2, 0).is_drag_in(MouseButton::Left, lr));
        assert!(!ev(MouseState::Dragged, 12, 0, 2, 0).is_drag_in(MouseButton::Left, lr));
        assert!(!ev(MouseState::Pressed, 4, 0, 2, 0).is_drag_in(MouseButton::Left, lr));
    }

    #[test]
    fn negative_coordinates_never_contained() {
        let lr = LineRange::to_end(0);
        assert!(!ev(MouseState::Dragged, -1, 0, -1, 0).is_drag_in(MouseButton::Left, lr));
    }

    #[test]
    fn translation_moves_press_origin_too() {
        let e = ev(MouseState::Dragged, 5, 3, 4, 3).translated(-2, -3);
        assert_eq!((e.x, e.y), (3, 0));
        assert_eq!((e.press_x, e.press_y), (2, 0));
    }

    // ── SGR decoding ───────────────────────────────────────────────────

    #[test]
    fn decode_press() {
        let (r, used) = decode_sgr(b"\x1b[<0;4;2M").unwrap();
        assert_eq!(r, SgrReport { cb: 0, x: 3, y: 1, release: false });
        assert_eq!(used, 9);
    }

    #[test]
    fn decode_release() {
        let (r, _) = decode_sgr(b"\x1b[<2;1;1m").unwrap();
        assert!(r.release);
        assert_eq!(r.cb, 2);
        assert_eq!((r.x, r.y), (0, 0));
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(decode_sgr(b"\x1b[<0;4M"), None);
        assert_eq!(decode_sgr(b"\x1b[<0;4;2;9M"), None);
        assert_eq!(decode_sgr(b"\x1b[<0;x;2M"), None);
        assert_eq!(decode_sgr(b"\x1b[0;4;2M"), None);
        assert_eq!(decode_sgr(b"\x1b[<0;4;2"), None);
    }

    // ── Tracking ───────────────────────────────────────────────────────

    #[test]
    fn drag_carries_press_origin() {
        let mut t = ButtonTracker::new();
        let press = t.track(SgrReport { cb: 0, x: 2, y: 0, release: false });
        assert_eq!(press.state, MouseState::Pressed);

        let drag = t.track(SgrReport { cb: 32, x: 7, y: 0, release: false });
        assert_eq!(drag.state, MouseState::Dragged);
        assert_eq!((drag.press_x, drag.press_y), (2, 0));

        let rel = t.track(SgrReport { cb: 0, x: 7, y: 0, release: true });
        assert_eq!(rel.state, MouseState::Released);
        assert_eq!(rel.press_x, 2);
    }

    #[test]
    fn double_click_same_cell() {
        let mut t = ButtonTracker::new();
        let now = Instant::now();
        let first = t.track_at(SgrReport { cb: 0, x: 1, y: 1, release: false }, now);
        assert_eq!(first.state, MouseState::Pressed);
        let _ = t.track_at(SgrReport { cb: 0, x: 1, y: 1, release: true }, now);
        let second = t.track_at(
            SgrReport { cb: 0, x: 1, y: 1, release: false },
            now + Duration::from_millis(100),
        );
        assert_eq!(second.state, MouseState::DoubleClick);
    }

    #[test]
    fn slow_second_press_is_not_double_click() {
        let mut t = ButtonTracker::new();
        let now = Instant::now();
        let _ = t.track_at(SgrReport { cb: 0, x: 1, y: 1, release: false }, now);
        let second = t.track_at(
            SgrReport { cb: 0, x: 1, y: 1, release: false },
            now + Duration::from_millis(900),
        );
        assert_eq!(second.state, MouseState::Pressed);
    }

    #[test]
    fn scroll_reports_map_to_wheel_buttons() {
        let mut t = ButtonTracker::new();
        let up = t.track(SgrReport { cb: 64, x: 0, y: 0, release: false });
        assert_eq!(up.button, MouseButton::ScrollUp);
        let down = t.track(SgrReport { cb: 65, x: 0, y: 0, release: false });
        assert_eq!(down.button, MouseButton::ScrollDown);
    }
}
