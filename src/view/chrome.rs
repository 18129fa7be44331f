//! Chrome and stock painters.
//!
//! The pieces every view shares: header bar, footer with pagination
//! and tap buttons, error/idle panels, and the stock entry painters
//! the built-in views use for rows and grid cells.

use crate::fmt;
use crate::surface::{Pane, Surface};
use crate::text::truncate;
use crate::touch::{TouchMap, ZoneAction};
use crate::types::{palette, Attr, BorderStyle, Rect};
use crate::view::PaintFn;

/// Rows the header occupies (title + rule).
pub const HEADER_ROWS: u16 = 2;
/// Rows the footer occupies.
pub const FOOTER_ROWS: u16 = 1;

// =============================================================================
// Header / footer
// =============================================================================

/// Draw the title row and rule across the top.
pub fn draw_header(surface: &mut Surface, title: &str, status: Option<&str>) {
    let width = surface.width();

    surface.draw_text(
        1,
        0,
        &truncate(title, width.saturating_sub(2)),
        palette::ORANGE,
        None,
        Attr::BOLD,
        None,
    );

    if let Some(status) = status {
        // Leave the title at least half the row.
        let max = width / 2;
        surface.draw_text_right(
            0,
            0,
            width.saturating_sub(1),
            &truncate(status, max),
            palette::LIGHT_GRAY,
            None,
            Attr::NONE,
            None,
        );
    }

    surface.draw_hline(0, 1, width, '─', palette::GRAY, None, None);
}

/// Draw the footer and register its tap zones.
///
/// Layout: hint left, `page/pages` centered, `▲ ▼` buttons right. The
/// buttons are only drawn (and their zones only registered) when there
/// is more than one page.
pub fn draw_footer(
    surface: &mut Surface,
    hint: &str,
    page: usize,
    pages: usize,
    zones: &mut TouchMap,
) {
    let width = surface.width();
    let y = surface.height().saturating_sub(FOOTER_ROWS);

    surface.draw_hline(0, y, width, ' ', palette::LIGHT_GRAY, Some(palette::GRAY), None);

    surface.draw_text(
        1,
        y,
        &truncate(hint, width / 2),
        palette::LIGHT_GRAY,
        Some(palette::GRAY),
        Attr::NONE,
        None,
    );

    if pages > 1 {
        let label = format!("{}/{}", page + 1, pages);
        surface.draw_text_centered(
            0,
            y,
            width,
            &label,
            palette::WHITE,
            Some(palette::GRAY),
            Attr::NONE,
            None,
        );

        // Two 3-cell buttons on the right edge.
        let fwd_x = width.saturating_sub(4);
        let back_x = fwd_x.saturating_sub(4);
        surface.draw_text(back_x, y, " ▲ ", palette::CYAN, Some(palette::GRAY), Attr::BOLD, None);
        surface.draw_text(fwd_x, y, " ▼ ", palette::CYAN, Some(palette::GRAY), Attr::BOLD, None);

        zones.add(Rect::new(back_x, y, 3, 1), ZoneAction::PageBack);
        zones.add(Rect::new(fwd_x, y, 3, 1), ZoneAction::PageForward);
    }
}

// =============================================================================
// Panels
// =============================================================================

/// Fault panel drawn in place of the body when a fetch fails.
pub fn draw_error_panel(surface: &mut Surface, body: Rect, message: &str) {
    if body.is_empty() {
        return;
    }

    surface.fill_rect(body, palette::BLACK, None);
    surface.draw_border(body, BorderStyle::Single, palette::RED, None, None);

    let inner = body.inset(1);
    if inner.is_empty() {
        return;
    }

    let mid = inner.y + inner.height / 2;
    surface.draw_text_centered(
        inner.x,
        mid.saturating_sub(1),
        inner.width,
        "peripheral fault",
        palette::RED,
        None,
        Attr::BOLD,
        None,
    );
    surface.draw_text_centered(
        inner.x,
        mid,
        inner.width,
        &truncate(message, inner.width),
        palette::LIGHT_GRAY,
        None,
        Attr::NONE,
        None,
    );
}

/// Placeholder body for a monitor with nothing mountable on it.
pub fn draw_idle_panel(pane: &mut Pane<'_>, monitor_id: &str) {
    if pane.width() == 0 || pane.height() == 0 {
        return;
    }

    pane.clear(palette::BLACK);

    let mid = pane.height() / 2;
    pane.draw_text_centered(mid.saturating_sub(1), monitor_id, palette::GRAY, None, Attr::BOLD);
    pane.draw_text_centered(mid, "no view assigned", palette::GRAY, None, Attr::NONE);
}

// =============================================================================
// Stock painters
// =============================================================================

/// Stock list row: toned label left, detail right, inverse when
/// selected.
pub fn standard_row() -> PaintFn {
    Box::new(|pane: &mut Pane<'_>, entry, selected| {
        let width = pane.width();
        if width == 0 || pane.height() == 0 {
            return;
        }

        let (fg, attrs) = if selected {
            (palette::BLACK, Attr::BOLD)
        } else {
            (entry.tone.color(), Attr::NONE)
        };
        if selected {
            pane.fill_rect(Rect::new(0, 0, width, 1), palette::LIGHT_GRAY);
        }

        let detail_width = crate::text::string_width(&entry.detail);
        let label_width = width.saturating_sub(detail_width + 2);
        pane.draw_text(1, 0, &truncate(&entry.label, label_width), fg, None, attrs);
        pane.draw_text_right(0, &entry.detail, fg, None, Attr::NONE);
    })
}

/// Stock grid cell: label, muted detail, and a bar when the entry
/// carries a fill fraction. Degrades by dropping rows when the cell is
/// shorter than three rows.
pub fn bar_cell() -> PaintFn {
    Box::new(|pane: &mut Pane<'_>, entry, _selected| {
        let width = pane.width();
        let height = pane.height();
        if width == 0 || height == 0 {
            return;
        }

        pane.draw_text(
            0,
            0,
            &truncate(&entry.label, width),
            entry.tone.color(),
            None,
            Attr::BOLD,
        );

        if height >= 2 {
            pane.draw_text(
                0,
                1,
                &truncate(&entry.detail, width),
                palette::LIGHT_GRAY,
                None,
                Attr::NONE,
            );
        }

        if let Some(fill) = entry.fill {
            if height >= 3 {
                let bar_width = width.saturating_sub(5);
                pane.draw_progress(0, 2, bar_width, fill, entry.tone.color(), palette::GRAY);
                pane.draw_text_right(2, &fmt::percent(fill), palette::WHITE, None, Attr::NONE);
            }
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
