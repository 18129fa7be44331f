//! Terminal-backed monitor.
//!
//! Drives a local terminal as if it were a wall monitor: raw mode +
//! alternate screen, mouse presses reported as touches. Mostly used by
//! the demos and for previewing view layouts without hardware.
//!
//! The terminal is restored on drop, even if the runtime bails early.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
    MouseEventKind,
};
use crossterm::style::{
    Attribute as CtAttr, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{cursor, event, execute, queue};

use super::{CellRun, Monitor, Touch};
use crate::types::{Attr, Rgb};

/// A monitor rendered onto the local terminal.
pub struct TerminalMonitor {
    id: String,
    out: Stdout,
    width: u16,
    height: u16,
    closed: bool,
}

impl TerminalMonitor {
    /// Take over the terminal: raw mode, alternate screen, hidden
    /// cursor, mouse capture.
    pub fn new(id: impl Into<String>) -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        let mut out = io::stdout();

        enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            Clear(ClearType::All)
        )?;

        Ok(Self {
            id: id.into(),
            out,
            width,
            height,
            closed: false,
        })
    }

    fn restore(&mut self) {
        // Best effort; the terminal may already be gone.
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

impl Monitor for TerminalMonitor {
    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn apply(&mut self, runs: &[CellRun]) -> io::Result<()> {
        for run in runs {
            queue!(self.out, cursor::MoveTo(run.x, run.y))?;

            // Group cells into segments of equal style to keep the
            // escape traffic down.
            let mut segment = String::new();
            let mut style: Option<(Rgb, Rgb, Attr)> = None;

            for cell in &run.cells {
                // Continuation cell of a wide glyph: the glyph itself
                // already advanced the cursor past it.
                if cell.ch == '\0' {
                    continue;
                }

                let cell_style = (cell.fg, cell.bg, cell.attrs);
                if style != Some(cell_style) {
                    if !segment.is_empty() {
                        queue!(self.out, Print(std::mem::take(&mut segment)))?;
                    }
                    queue!(
                        self.out,
                        SetAttribute(CtAttr::Reset),
                        SetForegroundColor(to_ct(cell.fg)),
                        SetBackgroundColor(to_ct(cell.bg))
                    )?;
                    for attr in ct_attrs(cell.attrs) {
                        queue!(self.out, SetAttribute(attr))?;
                    }
                    style = Some(cell_style);
                }
                segment.push(cell.ch);
            }

            if !segment.is_empty() {
                queue!(self.out, Print(segment))?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn drain_touches(&mut self) -> Vec<Touch> {
        let mut touches = Vec::new();

        // Drain whatever is pending without blocking the tick.
        while event::poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Mouse(m)) => {
                    if let MouseEventKind::Down(MouseButton::Left) = m.kind {
                        touches.push(Touch {
                            x: m.column,
                            y: m.row,
                        });
                    }
                }
                Ok(Event::Key(k)) => {
                    let ctrl_c = k.code == KeyCode::Char('c')
                        && k.modifiers.contains(KeyModifiers::CONTROL);
                    if ctrl_c || k.code == KeyCode::Char('q') || k.code == KeyCode::Esc {
                        self.closed = true;
                    }
                }
                Ok(Event::Resize(w, h)) => {
                    self.width = w;
                    self.height = h;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }

        touches
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}

impl Drop for TerminalMonitor {
    fn drop(&mut self) {
        self.restore();
    }
}

fn to_ct(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn ct_attrs(attrs: Attr) -> Vec<CtAttr> {
    let mut out = Vec::new();
    if attrs.contains(Attr::BOLD) {
        out.push(CtAttr::Bold);
    }
    if attrs.contains(Attr::DIM) {
        out.push(CtAttr::Dim);
    }
    if attrs.contains(Attr::UNDERLINE) {
        out.push(CtAttr::Underlined);
    }
    if attrs.contains(Attr::INVERSE) {
        out.push(CtAttr::Reverse);
    }
    out
}
