//! Core cell types.
//!
//! Everything the surface and flush path understand is defined here:
//! colors, attributes, cells, rectangles, borders. These types flow
//! from the view painters down to the monitor, so they stay small and
//! `Copy`-friendly - the diff flusher compares frames with `==`.

// =============================================================================
// Color
// =============================================================================

/// RGB color with 8-bit channels.
///
/// Monitor cells are opaque, so there is no alpha channel. Integer
/// channels give exact equality, which frame diffing relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from individual channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 0xRRGGBB integer.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Linear interpolation between two colors.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        Self {
            r: (a.r as f32 * inv + b.r as f32 * t) as u8,
            g: (a.g as f32 * inv + b.g as f32 * t) as u8,
            b: (a.b as f32 * inv + b.b as f32 * t) as u8,
        }
    }

    /// Dim the color by a factor (0.0 = black, 1.0 = unchanged).
    #[inline]
    pub fn dim(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
        }
    }
}

// =============================================================================
// Monitor palette
// =============================================================================

/// The 16-entry monitor palette.
///
/// Values match the default palette of the display hardware the views
/// target, so screenshots line up with what operators see in the field.
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::from_rgb_int(0xF0F0F0);
    pub const ORANGE: Rgb = Rgb::from_rgb_int(0xF2B233);
    pub const MAGENTA: Rgb = Rgb::from_rgb_int(0xE57FD8);
    pub const LIGHT_BLUE: Rgb = Rgb::from_rgb_int(0x99B2F2);
    pub const YELLOW: Rgb = Rgb::from_rgb_int(0xDEDE6C);
    pub const LIME: Rgb = Rgb::from_rgb_int(0x7FCC19);
    pub const PINK: Rgb = Rgb::from_rgb_int(0xF2B2CC);
    pub const GRAY: Rgb = Rgb::from_rgb_int(0x4C4C4C);
    pub const LIGHT_GRAY: Rgb = Rgb::from_rgb_int(0x999999);
    pub const CYAN: Rgb = Rgb::from_rgb_int(0x4C99B2);
    pub const PURPLE: Rgb = Rgb::from_rgb_int(0xB266E5);
    pub const BLUE: Rgb = Rgb::from_rgb_int(0x3366CC);
    pub const BROWN: Rgb = Rgb::from_rgb_int(0x7F664C);
    pub const GREEN: Rgb = Rgb::from_rgb_int(0x57A64E);
    pub const RED: Rgb = Rgb::from_rgb_int(0xCC4C4C);
    pub const BLACK: Rgb = Rgb::from_rgb_int(0x111111);
}

/// Semantic color classes used by entry painters.
///
/// Views tag entries with a tone instead of picking palette colors,
/// so related views stay visually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Good,
    Warn,
    Bad,
    Muted,
}

impl Tone {
    /// Foreground color for this tone.
    pub const fn color(self) -> Rgb {
        match self {
            Tone::Normal => palette::WHITE,
            Tone::Good => palette::LIME,
            Tone::Warn => palette::YELLOW,
            Tone::Bad => palette::RED,
            Tone::Muted => palette::LIGHT_GRAY,
        }
    }
}

// =============================================================================
// Cell attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for cheap storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::INVERSE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE = 1 << 3;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single monitor cell.
///
/// The whole pipeline computes these; the flush path compares and
/// ships them. Nothing more complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: palette::WHITE,
            bg: palette::BLACK,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// Rect
// =============================================================================

/// A rectangle in cell coordinates.
///
/// Used both as a clip region for drawing and as a touch zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Compute the intersection of two rects, `None` if they don't overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x2 > x1 && y2 > y1 {
            Some(Rect {
                x: x1,
                y: y1,
                width: x2 - x1,
                height: y2 - y1,
            })
        } else {
            None
        }
    }

    /// Shrink the rect by `n` cells on every side.
    pub fn inset(&self, n: u16) -> Rect {
        let d = n * 2;
        if self.width <= d || self.height <= d {
            return Rect::new(self.x + self.width / 2, self.y + self.height / 2, 0, 0);
        }
        Rect::new(self.x + n, self.y + n, self.width - d, self.height - d)
    }
}

// =============================================================================
// Border styles
// =============================================================================

/// Border style for framed panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double = 2,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded = 3,
    /// - | + + + +
    Ascii = 4,
}

impl BorderStyle {
    /// Border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
            Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
            Self::Rounded => ('─', '│', '╭', '╮', '╯', '╰'),
            Self::Ascii => ('-', '|', '+', '+', '+', '+'),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_int() {
        assert_eq!(Rgb::from_rgb_int(0xCC4C4C), Rgb::new(0xCC, 0x4C, 0x4C));
        assert_eq!(palette::RED, Rgb::new(0xCC, 0x4C, 0x4C));
    }

    #[test]
    fn test_rgb_lerp() {
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        assert_eq!(Rgb::lerp(black, white, 0.0), black);
        assert_eq!(Rgb::lerp(black, white, 1.0), white);
        let mid = Rgb::lerp(black, white, 0.5);
        assert!(mid.r > 100 && mid.r < 155);
    }

    #[test]
    fn test_rgb_dim() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(c.dim(0.5), Rgb::new(100, 50, 25));
        assert_eq!(c.dim(1.0), c);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 29));
        assert!(!r.contains(9, 10));
        assert!(!r.contains(30, 10));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 20, 20);
        let b = Rect::new(10, 10, 20, 20);

        let i = a.intersect(&b).unwrap();
        assert_eq!(i, Rect::new(10, 10, 10, 10));

        let c = Rect::new(100, 100, 10, 10);
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect::new(2, 2, 10, 6);
        assert_eq!(r.inset(1), Rect::new(3, 3, 8, 4));
        assert!(r.inset(5).is_empty());
    }

    #[test]
    fn test_cell_equality() {
        let a = Cell::default();
        let mut b = a;
        assert_eq!(a, b);
        b.ch = 'x';
        assert_ne!(a, b);
    }

    #[test]
    fn test_tone_colors_distinct() {
        let tones = [Tone::Normal, Tone::Good, Tone::Warn, Tone::Bad, Tone::Muted];
        for (i, a) in tones.iter().enumerate() {
            for b in &tones[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
    }
}
