// SPDX-License-Identifier: MIT
//
// loglook — a small demo viewer for the line-rendering engine.
//
// Wires together the three crates:
//
//   ll-term   → cells, colors, backend contract, mouse decoding, watchdog
//   ll-theme  → role table, palette, perceptual color math
//   ll-render → expansion, attribute resolution, render driver
//
// The binary builds a theme, renders a handful of sample log lines
// through an ANSI backend that writes straight to stdout, and exits.
// It exists to eyeball the pipeline on a real terminal; the engine
// itself is exercised by the crate test suites.
//
// Usage: loglook [theme-name]

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use ll_render::line::{AttrLine, SpanValue};
use ll_render::render::render_line;
use ll_term::backend::{Backend, Capabilities, Size};
use ll_term::cell::{Attr, Cell};
use ll_term::color::Channel;
use ll_term::range::{LineRange, RangeUnit};
use ll_term::timer;
use ll_theme::role::{IconId, Level, Role};
use ll_theme::state::ThemeState;
use tracing::warn;

// ─── ANSI backend ───────────────────────────────────────────────────────────

/// A write-through backend emitting ANSI escape sequences.
///
/// Cells are buffered as text and flushed once, so a render pass is a
/// single write to the terminal.
struct AnsiBackend {
    size: Size,
    caps: Capabilities,
    out: String,
}

impl AnsiBackend {
    fn new(cols: u16, rows: u16, caps: Capabilities) -> Self {
        Self {
            size: Size { cols, rows },
            caps,
            out: String::new(),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.push_str("\x1b[0m");
        io::stdout().write_all(self.out.as_bytes())?;
        self.out.clear();
        Ok(())
    }

    fn push_sgr(&mut self, cell: &Cell) {
        self.out.push_str("\x1b[0");
        for (flag, code) in [
            (Attr::BOLD, "1"),
            (Attr::ITALIC, "3"),
            (Attr::UNDERLINE, "4"),
            (Attr::BLINK, "5"),
            (Attr::REVERSE, "7"),
            (Attr::STRUCK, "9"),
        ] {
            if cell.attrs.contains(flag) {
                self.out.push(';');
                self.out.push_str(code);
            }
        }
        match cell.fg {
            Channel::Default => {}
            Channel::Palette(n) => self.out.push_str(&format!(";38;5;{n}")),
            Channel::Rgb(r, g, b) => self.out.push_str(&format!(";38;2;{r};{g};{b}")),
        }
        match cell.bg {
            Channel::Default => {}
            Channel::Palette(n) => self.out.push_str(&format!(";48;5;{n}")),
            Channel::Rgb(r, g, b) => self.out.push_str(&format!(";48;2;{r};{g};{b}")),
        }
        self.out.push('m');
    }
}

impl Backend for AnsiBackend {
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
        self.out.push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
        self.push_sgr(&cell);
        self.out.push(cell.ch);
    }

    fn move_cursor(&mut self, row: u16, col: u16) {
        self.out.push_str(&format!("\x1b[{};{}H", row + 1, col + 1));
    }
}

// ─── Sample content ─────────────────────────────────────────────────────────

fn sample_lines() -> Vec<(AttrLine, Role)> {
    // Columns 20..25 hold the host name on the timestamped lines; the
    // Identifier role hashes it into a stable highlight color.
    let ident = |line: AttrLine| {
        line.with_span(LineRange::new(20, 25), SpanValue::Role(Role::Identifier))
    };

    vec![
        (
            ident(
                AttrLine::new("2026-08-24T10:15:01 web-1 INFO  request served in 12ms")
                    .with_span(LineRange::new(0, 19), SpanValue::Role(Role::TimeColumn))
                    .with_span(LineRange::new(26, 31), SpanValue::Level(Level::Info)),
            ),
            Role::Text,
        ),
        (
            ident(
                AttrLine::new("2026-08-24T10:15:02 web-2 WARN  retry budget at 80%")
                    .with_span(LineRange::new(0, 19), SpanValue::Role(Role::TimeColumn))
                    .with_span(LineRange::new(26, 31), SpanValue::Level(Level::Warning))
                    .with_span(LineRange::new(26, 27), SpanValue::Icon(IconId::Warning)),
            ),
            Role::Text,
        ),
        (
            // The ERROR token is annotated in raw byte units; the tab in
            // front of it shifts under expansion and the span follows.
            ident(
                AttrLine::new("2026-08-24T10:15:03 web-1\tERROR upstream timed out")
                    .with_span(LineRange::new(0, 19), SpanValue::Role(Role::TimeColumn))
                    .with_span(
                        LineRange::new(26, 31).with_unit(RangeUnit::Bytes),
                        SpanValue::Level(Level::Error),
                    ),
            ),
            Role::Text,
        ),
        (
            AttrLine::new("marker: \x07 bell, \x1b escape, ctrl \x01 bytes survive")
                .with_span(LineRange::to_end(0), SpanValue::RoleFg(Role::Comment)),
            Role::AltRow,
        ),
        (
            AttrLine::new("selected for copy: drag me")
                .with_span(LineRange::new(19, 26), SpanValue::Role(Role::SelectedText)),
            Role::CursorLine,
        ),
    ]
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = timer::install() {
        warn!(%err, "watchdog timer unavailable");
    }

    let theme_name = env::args().nth(1).unwrap_or_else(|| "default".to_string());
    let caps = Capabilities::TRUE_COLOR;
    let mut report = |err| warn!(%err, "theme problem");
    let theme = ThemeState::from_name(&theme_name, caps, &mut report);

    let cols = env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100);
    let lines = sample_lines();
    #[allow(clippy::cast_possible_truncation)]
    let rows = lines.len() as u16;
    let mut backend = AnsiBackend::new(cols, rows, caps);

    print!("\x1b[2J");
    for (row, (line, base)) in lines.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let row = row as u16;
        let result = render_line(
            &mut backend,
            &theme,
            line,
            row,
            0,
            LineRange::to_end(0),
            *base,
        );
        if let Some(text) = result.selection {
            warn!(text, "selection captured");
        }
    }

    if let Err(err) = backend.flush() {
        eprintln!("loglook: {err}");
        return ExitCode::FAILURE;
    }
    println!();
    ExitCode::SUCCESS
}
