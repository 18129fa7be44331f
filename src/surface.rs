//! Surface and drawing primitives.
//!
//! A `Surface` is the off-screen window buffer a view paints into.
//! All drawing operations work on this grid; nothing reaches the
//! monitor until the flush path diffs it against the last shipped
//! frame.
//!
//! # Design decisions
//!
//! - **Flat storage**: `Vec<Cell>` with row-major indexing.
//! - **Clipping**: drawing ops accept an optional `Rect`; writes
//!   outside it (or outside the buffer) are silently dropped.
//! - **Background preservation**: text ops take `Option<Rgb>` for the
//!   background - `None` keeps whatever the cell already has, so
//!   labels can sit on filled panels.

use crate::text::{char_width, string_width};
use crate::types::{Attr, BorderStyle, Cell, Rect, Rgb};

// =============================================================================
// Surface
// =============================================================================

/// A 2D buffer of monitor cells.
///
/// Row-major indexing: `index = y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Surface {
    /// Create a new surface filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Full buffer bounds.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (`None` if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Raw cells slice, for the flush path.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the whole surface to a background color.
    pub fn clear(&mut self, bg: Rgb) {
        let blank = Cell {
            bg,
            ..Cell::default()
        };
        self.cells.fill(blank);
    }

    /// Resize the surface, clearing content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.cells.clear();
        self.cells.resize(size, Cell::default());
    }

    // =========================================================================
    // Drawing primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was written.
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        fg: Rgb,
        bg: Option<Rgb>,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];
        cell.ch = ch;
        cell.fg = fg;
        if let Some(bg) = bg {
            cell.bg = bg;
        }
        cell.attrs = attrs;
        true
    }

    /// Fill a rectangle with a background color, blanking the glyphs.
    pub fn fill_rect(&mut self, rect: Rect, bg: Rgb, clip: Option<&Rect>) {
        let target = match rect.intersect(&self.bounds()) {
            Some(r) => r,
            None => return,
        };
        let target = match clip {
            Some(clip) => match target.intersect(clip) {
                Some(r) => r,
                None => return,
            },
            None => target,
        };

        for y in target.y..target.y + target.height {
            let start = self.index(target.x, y);
            let end = start + target.width as usize;
            for cell in &mut self.cells[start..end] {
                cell.ch = ' ';
                cell.bg = bg;
                cell.attrs = Attr::NONE;
            }
        }
    }

    /// Draw text at a position.
    ///
    /// Wide characters mark their continuation cell with a NUL glyph so
    /// the flush path can skip it. Returns the number of cells used.
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgb,
        bg: Option<Rgb>,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> u16 {
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }

            let w = char_width(ch);
            if w == 0 {
                continue;
            }

            if self.set_cell(col, y, ch, fg, bg, attrs, clip) && w == 2 {
                // Continuation marker for the second cell of a wide char.
                self.set_cell(col + 1, y, '\0', fg, bg, attrs, clip);
            }

            col += w;
        }

        col.saturating_sub(x)
    }

    /// Draw text centered within `width` cells starting at `x`.
    pub fn draw_text_centered(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        fg: Rgb,
        bg: Option<Rgb>,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> u16 {
        let tw = string_width(text);
        if tw >= width {
            return self.draw_text(x, y, text, fg, bg, attrs, clip);
        }
        let offset = (width - tw) / 2;
        self.draw_text(x + offset, y, text, fg, bg, attrs, clip)
    }

    /// Draw text right-aligned within `width` cells starting at `x`.
    pub fn draw_text_right(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        fg: Rgb,
        bg: Option<Rgb>,
        attrs: Attr,
        clip: Option<&Rect>,
    ) -> u16 {
        let tw = string_width(text);
        if tw >= width {
            return self.draw_text(x, y, text, fg, bg, attrs, clip);
        }
        self.draw_text(x + (width - tw), y, text, fg, bg, attrs, clip)
    }

    /// Draw a horizontal line of `length` cells.
    pub fn draw_hline(
        &mut self,
        x: u16,
        y: u16,
        length: u16,
        ch: char,
        fg: Rgb,
        bg: Option<Rgb>,
        clip: Option<&Rect>,
    ) {
        for col in x..x.saturating_add(length).min(self.width) {
            self.set_cell(col, y, ch, fg, bg, Attr::NONE, clip);
        }
    }

    /// Draw a border around a rectangle.
    pub fn draw_border(
        &mut self,
        rect: Rect,
        style: BorderStyle,
        fg: Rgb,
        bg: Option<Rgb>,
        clip: Option<&Rect>,
    ) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let x2 = rect.x + rect.width - 1;
        let y2 = rect.y + rect.height - 1;

        self.set_cell(rect.x, rect.y, tl, fg, bg, Attr::NONE, clip);
        self.set_cell(x2, rect.y, tr, fg, bg, Attr::NONE, clip);
        self.set_cell(x2, y2, br, fg, bg, Attr::NONE, clip);
        self.set_cell(rect.x, y2, bl, fg, bg, Attr::NONE, clip);

        for col in (rect.x + 1)..x2 {
            self.set_cell(col, rect.y, horiz, fg, bg, Attr::NONE, clip);
            self.set_cell(col, y2, horiz, fg, bg, Attr::NONE, clip);
        }
        for row in (rect.y + 1)..y2 {
            self.set_cell(rect.x, row, vert, fg, bg, Attr::NONE, clip);
            self.set_cell(x2, row, vert, fg, bg, Attr::NONE, clip);
        }
    }

    /// Draw a one-row progress bar.
    pub fn draw_progress(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        frac: f32,
        filled_fg: Rgb,
        empty_fg: Rgb,
        bg: Option<Rgb>,
        clip: Option<&Rect>,
    ) {
        let frac = frac.clamp(0.0, 1.0);
        let filled = (frac * width as f32).round() as u16;

        for col in 0..width {
            let (ch, fg) = if col < filled {
                ('█', filled_fg)
            } else {
                ('░', empty_fg)
            };
            self.set_cell(x + col, y, ch, fg, bg, Attr::NONE, clip);
        }
    }

    /// Borrow a sub-region as a `Pane` with local coordinates.
    ///
    /// The rect is clamped to the surface bounds.
    pub fn pane(&mut self, rect: Rect) -> Pane<'_> {
        let rect = rect.intersect(&self.bounds()).unwrap_or_default();
        Pane {
            surface: self,
            rect,
        }
    }
}

// =============================================================================
// Pane
// =============================================================================

/// A borrowed, translated, clipped sub-region of a surface.
///
/// Strategy bodies and cell painters receive panes so they can draw in
/// local coordinates without knowing where on the monitor their region
/// sits. This is the sub-display of the view contract.
pub struct Pane<'a> {
    surface: &'a mut Surface,
    rect: Rect,
}

impl<'a> Pane<'a> {
    #[inline]
    pub fn width(&self) -> u16 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.rect.height
    }

    /// The pane's rect in surface coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Fill the whole pane with a background color.
    pub fn clear(&mut self, bg: Rgb) {
        self.surface.fill_rect(self.rect, bg, None);
    }

    pub fn fill_rect(&mut self, rect: Rect, bg: Rgb) {
        if let Some(global) = self.translate(rect) {
            self.surface.fill_rect(global, bg, Some(&self.rect));
        }
    }

    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgb, bg: Option<Rgb>, attrs: Attr) {
        if y >= self.rect.height {
            return;
        }
        self.surface.draw_text(
            self.rect.x + x,
            self.rect.y + y,
            text,
            fg,
            bg,
            attrs,
            Some(&self.rect),
        );
    }

    pub fn draw_text_centered(&mut self, y: u16, text: &str, fg: Rgb, bg: Option<Rgb>, attrs: Attr) {
        if y >= self.rect.height {
            return;
        }
        self.surface.draw_text_centered(
            self.rect.x,
            self.rect.y + y,
            self.rect.width,
            text,
            fg,
            bg,
            attrs,
            Some(&self.rect),
        );
    }

    pub fn draw_text_right(&mut self, y: u16, text: &str, fg: Rgb, bg: Option<Rgb>, attrs: Attr) {
        if y >= self.rect.height {
            return;
        }
        self.surface.draw_text_right(
            self.rect.x,
            self.rect.y + y,
            self.rect.width,
            text,
            fg,
            bg,
            attrs,
            Some(&self.rect),
        );
    }

    pub fn draw_hline(&mut self, y: u16, ch: char, fg: Rgb) {
        if y >= self.rect.height {
            return;
        }
        self.surface.draw_hline(
            self.rect.x,
            self.rect.y + y,
            self.rect.width,
            ch,
            fg,
            None,
            Some(&self.rect),
        );
    }

    pub fn draw_border(&mut self, style: BorderStyle, fg: Rgb) {
        self.surface
            .draw_border(self.rect, style, fg, None, Some(&self.rect));
    }

    pub fn draw_progress(&mut self, x: u16, y: u16, width: u16, frac: f32, filled: Rgb, empty: Rgb) {
        if y >= self.rect.height {
            return;
        }
        let width = width.min(self.rect.width.saturating_sub(x));
        self.surface.draw_progress(
            self.rect.x + x,
            self.rect.y + y,
            width,
            frac,
            filled,
            empty,
            None,
            Some(&self.rect),
        );
    }

    /// Re-borrow a sub-region of this pane (local coordinates).
    pub fn sub(&mut self, rect: Rect) -> Pane<'_> {
        let rect = self.translate(rect).unwrap_or_default();
        Pane {
            surface: &mut *self.surface,
            rect,
        }
    }

    /// Map a local rect to surface coordinates, clipped to the pane.
    fn translate(&self, local: Rect) -> Option<Rect> {
        let global = Rect::new(
            self.rect.x.saturating_add(local.x),
            self.rect.y.saturating_add(local.y),
            local.width,
            local.height,
        );
        global.intersect(&self.rect)
    }
}

// =============================================================================
// Tests
// =============================================================================
