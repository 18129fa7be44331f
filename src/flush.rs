//! Double-buffered flushing.
//!
//! `FrameDiff` keeps the last frame shipped to a monitor and, on each
//! flush, sends only the cells that changed - batched into horizontal
//! runs, wrapped in a single `apply`/`flush` pair so the monitor
//! presents a whole frame at once. This is what keeps the displays
//! flicker-free under periodic repaints.
//!
//! # Algorithm
//!
//! 1. If there is no previous frame (first flush, `invalidate()`, or a
//!    size change), ship every row as one run.
//! 2. Otherwise walk each row, opening a run at the first changed cell
//!    and closing it at the next unchanged one.
//! 3. `Monitor::flush` only when at least one run was applied.

use std::io;

use crate::monitor::{CellRun, Monitor};
use crate::surface::Surface;

/// Frame differ for one monitor.
pub struct FrameDiff {
    previous: Option<Surface>,
}

impl FrameDiff {
    pub fn new() -> Self {
        Self { previous: None }
    }

    /// Forget the previous frame; the next flush repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Ship `surface` to `monitor`, diffing against the last flush.
    ///
    /// Returns true if anything was written.
    pub fn flush(&mut self, surface: &Surface, monitor: &mut dyn Monitor) -> io::Result<bool> {
        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|p| p.width() == surface.width() && p.height() == surface.height());

        let runs = if same_size {
            let prev = self.previous.as_ref().unwrap();
            diff_runs(prev, surface)
        } else {
            full_runs(surface)
        };

        let changed = !runs.is_empty();
        if changed {
            monitor.apply(&runs)?;
            monitor.flush()?;
        }

        self.previous = Some(surface.clone());
        Ok(changed)
    }
}

impl Default for FrameDiff {
    fn default() -> Self {
        Self::new()
    }
}

/// Every row as one run.
fn full_runs(surface: &Surface) -> Vec<CellRun> {
    let width = surface.width() as usize;
    (0..surface.height())
        .map(|y| CellRun {
            x: 0,
            y,
            cells: surface.cells()[y as usize * width..(y as usize + 1) * width].to_vec(),
        })
        .collect()
}

/// Runs of contiguous changed cells, per row.
fn diff_runs(prev: &Surface, next: &Surface) -> Vec<CellRun> {
    let width = next.width() as usize;
    let mut runs = Vec::new();

    for y in 0..next.height() {
        let row_start = y as usize * width;
        let prev_row = &prev.cells()[row_start..row_start + width];
        let next_row = &next.cells()[row_start..row_start + width];

        let mut x = 0usize;
        while x < width {
            if prev_row[x] == next_row[x] {
                x += 1;
                continue;
            }

            let start = x;
            while x < width && prev_row[x] != next_row[x] {
                x += 1;
            }

            runs.push(CellRun {
                x: start as u16,
                y,
                cells: next_row[start..x].to_vec(),
            });
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::BufferMonitor;
    use crate::types::{palette, Attr};

    fn surface_with(text: &str, x: u16, y: u16, w: u16, h: u16) -> Surface {
        let mut s = Surface::new(w, h);
        s.draw_text(x, y, text, palette::WHITE, None, Attr::NONE, None);
        s
    }

    #[test]
    fn test_first_flush_is_full() {
        let mut diff = FrameDiff::new();
        let mut mon = BufferMonitor::new("m", 10, 3);
        let s = surface_with("abc", 0, 0, 10, 3);

        assert!(diff.flush(&s, &mut mon).unwrap());
        assert_eq!(mon.row_text(0), "abc       ");
        assert_eq!(mon.flush_count(), 1);
        assert!(diff.has_previous());
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut diff = FrameDiff::new();
        let mut mon = BufferMonitor::new("m", 10, 3);
        let s = surface_with("abc", 0, 0, 10, 3);

        diff.flush(&s, &mut mon).unwrap();
        assert!(!diff.flush(&s, &mut mon).unwrap());
        assert_eq!(mon.flush_count(), 1);
    }

    #[test]
    fn test_diff_ships_only_changes() {
        let mut diff = FrameDiff::new();
        let mut mon = BufferMonitor::new("m", 10, 3);

        diff.flush(&surface_with("abc", 0, 0, 10, 3), &mut mon).unwrap();

        // Change one row; the other rows stay as-is on the monitor.
        let mut s2 = surface_with("abc", 0, 0, 10, 3);
        s2.draw_text(4, 2, "xy", palette::WHITE, None, Attr::NONE, None);
        assert!(diff.flush(&s2, &mut mon).unwrap());

        assert_eq!(mon.row_text(0), "abc       ");
        assert_eq!(mon.row_text(2), "    xy    ");
        assert_eq!(mon.flush_count(), 2);
    }

    #[test]
    fn test_invalidate_forces_full_repaint() {
        let mut diff = FrameDiff::new();
        let mut mon = BufferMonitor::new("m", 10, 3);
        let s = surface_with("abc", 0, 0, 10, 3);

        diff.flush(&s, &mut mon).unwrap();
        diff.invalidate();
        assert!(!diff.has_previous());

        // Same content, but the flush happens anyway.
        assert!(diff.flush(&s, &mut mon).unwrap());
        assert_eq!(mon.flush_count(), 2);
    }

    #[test]
    fn test_size_change_forces_full_repaint() {
        let mut diff = FrameDiff::new();
        let mut mon = BufferMonitor::new("m", 12, 4);

        diff.flush(&surface_with("abc", 0, 0, 10, 3), &mut mon).unwrap();
        assert!(diff.flush(&surface_with("abc", 0, 0, 12, 4), &mut mon).unwrap());
    }

    #[test]
    fn test_run_batching() {
        let prev = Surface::new(10, 1);
        let mut next = Surface::new(10, 1);
        next.draw_text(1, 0, "ab", palette::WHITE, None, Attr::NONE, None);
        next.draw_text(6, 0, "cd", palette::WHITE, None, Attr::NONE, None);

        let runs = diff_runs(&prev, &next);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].x, runs[0].cells.len()), (1, 2));
        assert_eq!((runs[1].x, runs[1].cells.len()), (6, 2));
    }
}
