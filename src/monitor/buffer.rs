//! In-memory monitor.
//!
//! Backs headless use and the test suite. The cell grid and touch
//! queue live behind a shared handle: clones see the same state, so a
//! test can hand the monitor to a runtime and keep a handle to push
//! touches and read rows back.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::{CellRun, Monitor, Touch};
use crate::types::Cell;

/// A monitor backed by a plain cell grid. `Clone` shares the state.
#[derive(Clone)]
pub struct BufferMonitor {
    id: String,
    state: Rc<RefCell<State>>,
}

struct State {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    touches: VecDeque<Touch>,
    flush_count: u32,
    closed: bool,
}

impl BufferMonitor {
    pub fn new(id: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            id: id.into(),
            state: Rc::new(RefCell::new(State {
                width,
                height,
                cells: vec![Cell::default(); width as usize * height as usize],
                touches: VecDeque::new(),
                flush_count: 0,
                closed: false,
            })),
        }
    }

    /// Queue a touch press to be drained on the next tick.
    pub fn push_touch(&self, x: u16, y: u16) {
        self.state.borrow_mut().touches.push_back(Touch { x, y });
    }

    /// Mark the monitor as detached.
    pub fn close(&self) {
        self.state.borrow_mut().closed = true;
    }

    /// Number of flushes performed; lets tests assert that unchanged
    /// frames are not re-presented.
    pub fn flush_count(&self) -> u32 {
        self.state.borrow().flush_count
    }

    /// Cell at a position (`None` out of bounds).
    pub fn cell_at(&self, x: u16, y: u16) -> Option<Cell> {
        let s = self.state.borrow();
        if x < s.width && y < s.height {
            Some(s.cells[y as usize * s.width as usize + x as usize])
        } else {
            None
        }
    }

    /// A full row rendered to a string, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        let s = self.state.borrow();
        let mut out = String::new();
        if y >= s.height {
            return out;
        }
        for x in 0..s.width {
            let ch = s.cells[y as usize * s.width as usize + x as usize].ch;
            if ch != '\0' {
                out.push(ch);
            }
        }
        out
    }

    /// True if any row contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        let height = self.state.borrow().height;
        (0..height).any(|y| self.row_text(y).contains(needle))
    }
}

impl Monitor for BufferMonitor {
    fn id(&self) -> &str {
        &self.id
    }

    fn size(&self) -> (u16, u16) {
        let s = self.state.borrow();
        (s.width, s.height)
    }

    fn apply(&mut self, runs: &[CellRun]) -> io::Result<()> {
        let mut s = self.state.borrow_mut();
        let (width, height) = (s.width, s.height);
        for run in runs {
            if run.y >= height {
                continue;
            }
            for (i, cell) in run.cells.iter().enumerate() {
                let x = run.x + i as u16;
                if x >= width {
                    break;
                }
                s.cells[run.y as usize * width as usize + x as usize] = *cell;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state.borrow_mut().flush_count += 1;
        Ok(())
    }

    fn drain_touches(&mut self) -> Vec<Touch> {
        self.state.borrow_mut().touches.drain(..).collect()
    }

    fn should_close(&self) -> bool {
        self.state.borrow().closed
    }
}
