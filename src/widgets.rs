//! Composite widgets.
//!
//! Built from the surface primitives: labeled bars, block-character
//! sparklines, and multi-row gauges. Custom views assemble their
//! bodies from these.

use crate::fmt;
use crate::surface::Pane;
use crate::text::{string_width, truncate};
use crate::types::{palette, Attr, Rect, Rgb};

/// Block characters from empty to full, used by sparklines.
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A one-row bar with a caption on the left and a percentage on the
/// right: `Bytes  ████████░░░░  79%`.
pub fn labeled_bar(pane: &mut Pane<'_>, y: u16, label: &str, frac: f32, color: Rgb) {
    let width = pane.width();
    if width == 0 {
        return;
    }

    let pct = fmt::percent(frac);
    let label_width = (width / 4).max(4).min(width);
    let pct_width = string_width(&pct);
    let bar_width = width.saturating_sub(label_width + pct_width + 2);

    pane.draw_text(
        0,
        y,
        &truncate(label, label_width),
        palette::LIGHT_GRAY,
        None,
        Attr::NONE,
    );
    if bar_width > 0 {
        pane.draw_progress(label_width + 1, y, bar_width, frac, color, palette::GRAY);
    }
    pane.draw_text_right(y, &pct, palette::WHITE, None, Attr::NONE);
}

/// A one-row sparkline over `samples`, newest on the right.
///
/// Values are autoscaled to the sample maximum; an all-zero series
/// renders as a row of low blocks rather than nothing, so a flat line
/// still reads as "alive". When there are more samples than columns
/// only the newest are drawn.
pub fn sparkline(pane: &mut Pane<'_>, y: u16, samples: &[f32], color: Rgb) {
    let width = pane.width() as usize;
    if width == 0 || samples.is_empty() {
        return;
    }

    let visible = if samples.len() > width {
        &samples[samples.len() - width..]
    } else {
        samples
    };

    let max = visible.iter().cloned().fold(0.0f32, f32::max);
    let x0 = (width - visible.len()) as u16;

    for (i, sample) in visible.iter().enumerate() {
        let level = if max <= f32::EPSILON {
            0
        } else {
            let norm = (sample / max).clamp(0.0, 1.0);
            // Map 0..=1 onto the 8 block heights.
            ((norm * (BLOCKS.len() - 1) as f32).round() as usize).min(BLOCKS.len() - 1)
        };
        pane.draw_text(
            x0 + i as u16,
            y,
            &BLOCKS[level].to_string(),
            color,
            None,
            Attr::NONE,
        );
    }
}

/// A thick gauge: `rows` rows of bar with a centered reading overlaid
/// on the middle row.
pub fn gauge(pane: &mut Pane<'_>, area: Rect, frac: f32, reading: &str, color: Rgb) {
    if area.is_empty() {
        return;
    }

    for row in 0..area.height {
        pane.draw_progress(area.x, area.y + row, area.width, frac, color, palette::GRAY);
    }

    let mid = area.y + area.height / 2;
    let text = truncate(reading, area.width);
    let tw = string_width(&text);
    let tx = area.x + (area.width.saturating_sub(tw)) / 2;
    pane.draw_text(tx, mid, &text, palette::WHITE, Some(palette::BLACK), Attr::BOLD);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use crate::types::Rect;

    fn row_text(s: &Surface, y: u16) -> String {
        (0..s.width()).map(|x| s.get(x, y).unwrap().ch).collect()
    }

    #[test]
    fn test_labeled_bar() {
        let mut s = Surface::new(24, 2);
        labeled_bar(&mut s.pane(Rect::new(0, 0, 24, 2)), 0, "Bytes", 0.79, palette::LIME);

        let row = row_text(&s, 0);
        assert!(row.contains("Bytes"));
        assert!(row.contains("79%"));
        assert!(row.contains('█'));
        assert!(row.contains('░'));
    }

    #[test]
    fn test_sparkline_autoscale() {
        let mut s = Surface::new(8, 1);
        sparkline(
            &mut s.pane(Rect::new(0, 0, 8, 1)),
            0,
            &[0.0, 1.0, 2.0, 4.0],
            palette::CYAN,
        );

        let row = row_text(&s, 0);
        // Right-aligned: 4 leading blanks, then the ramp.
        assert_eq!(&row[..4], "    ");
        let cells: Vec<char> = row.chars().skip(4).collect();
        assert_eq!(cells[0], '▁');
        assert_eq!(cells[3], '█');
        // Half of max lands mid-ramp.
        assert!(cells[2] > cells[0] && cells[2] < cells[3]);
    }

    #[test]
    fn test_sparkline_flat_series() {
        let mut s = Surface::new(4, 1);
        sparkline(&mut s.pane(Rect::new(0, 0, 4, 1)), 0, &[0.0; 4], palette::CYAN);
        assert_eq!(row_text(&s, 0), "▁▁▁▁");
    }

    #[test]
    fn test_sparkline_truncates_to_newest() {
        let mut s = Surface::new(3, 1);
        let samples = [9.0, 9.0, 9.0, 1.0, 2.0, 9.0];
        sparkline(&mut s.pane(Rect::new(0, 0, 3, 1)), 0, &samples, palette::CYAN);

        let row = row_text(&s, 0);
        // Only the last three samples are visible.
        assert_eq!(row.chars().last().unwrap(), '█');
        assert_ne!(row.chars().next().unwrap(), '█');
    }

    #[test]
    fn test_gauge_overlay() {
        let mut s = Surface::new(20, 3);
        gauge(
            &mut s.pane(Rect::new(0, 0, 20, 3)),
            Rect::new(0, 0, 20, 3),
            0.5,
            "4.0 MFE",
            palette::GREEN,
        );

        assert_eq!(s.get(0, 0).unwrap().ch, '█');
        assert_eq!(s.get(19, 0).unwrap().ch, '░');
        assert!(row_text(&s, 1).contains("4.0 MFE"));
    }

    #[test]
    fn test_empty_inputs() {
        let mut s = Surface::new(10, 2);
        sparkline(&mut s.pane(Rect::new(0, 0, 10, 2)), 0, &[], palette::CYAN);
        gauge(
            &mut s.pane(Rect::new(0, 0, 10, 2)),
            Rect::new(0, 0, 0, 0),
            0.5,
            "x",
            palette::GREEN,
        );
        assert_eq!(row_text(&s, 0), "          ");
    }
}
