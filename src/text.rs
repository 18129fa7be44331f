//! Cell-width-aware text utilities.
//!
//! Monitor columns are cells, not bytes: CJK and most emoji occupy two
//! cells, control characters occupy none. Everything that lays text
//! out - truncation, wrapping, padding - has to count cells.

use unicode_width::UnicodeWidthChar;

/// Display width of a single character in cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Display width of a string in cells.
pub fn string_width(s: &str) -> u16 {
    s.chars().map(|c| char_width(c) as u32).sum::<u32>() as u16
}

/// Truncate text to fit within `width` cells, appending an ellipsis if
/// anything was cut.
///
/// A wide character that would straddle the cut point is dropped rather
/// than half-drawn. Never returns a string wider than `width`.
pub fn truncate(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }

    if string_width(text) <= width {
        return text.to_string();
    }

    // Leave room for the ellipsis.
    let target = width.saturating_sub(1);
    let mut result = String::new();
    let mut used = 0u16;

    for c in text.chars() {
        let w = char_width(c);
        if used + w > target {
            break;
        }
        result.push(c);
        used += w;
    }

    result.push('…');
    result
}

/// Word-agnostic wrap: break text into lines of at most `width` cells.
///
/// Explicit newlines always break; a zero width returns the text as a
/// single line.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut used = 0u16;

    for c in text.chars() {
        if c == '\n' {
            lines.push(std::mem::take(&mut line));
            used = 0;
            continue;
        }

        let w = char_width(c);
        if used + w > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            used = 0;
        }

        line.push(c);
        used += w;
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// Number of lines `text` occupies when wrapped to `width` cells.
pub fn measure_height(text: &str, width: u16) -> u16 {
    if text.is_empty() {
        return 0;
    }
    wrap(text, width).len().max(1) as u16
}

/// Pad or truncate to exactly `width` cells, left-aligned.
pub fn pad_left(text: &str, width: u16) -> String {
    fit(text, width, Align::Left)
}

/// Pad or truncate to exactly `width` cells, right-aligned.
pub fn pad_right(text: &str, width: u16) -> String {
    fit(text, width, Align::Right)
}

/// Pad or truncate to exactly `width` cells, centered.
pub fn pad_center(text: &str, width: u16) -> String {
    fit(text, width, Align::Center)
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
    Center,
}

fn fit(text: &str, width: u16, align: Align) -> String {
    let w = string_width(text);
    if w > width {
        let cut = truncate(text, width);
        let cut_w = string_width(&cut);
        // Wide-char drops can leave us a cell short.
        return format!("{}{}", cut, " ".repeat((width - cut_w) as usize));
    }

    let gap = (width - w) as usize;
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
        Align::Center => {
            let before = gap / 2;
            format!("{}{}{}", " ".repeat(before), text, " ".repeat(gap - before))
        }
    }
}
