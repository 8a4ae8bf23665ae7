//! Cell Styles
//!
//! Colors and text attributes carried by every cell. A [`Style`] is a plain
//! value: two colors and an attribute mask.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Color representation supporting the default color, the 256-color
/// palette, and 24-bit RGB
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// 256-color palette index
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

/// The 16 standard palette entries
const PALETTE_16: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00), // 0: Black
    (0x80, 0x00, 0x00), // 1: Maroon
    (0x00, 0x80, 0x00), // 2: Green
    (0x80, 0x80, 0x00), // 3: Olive
    (0x00, 0x00, 0x80), // 4: Navy
    (0x80, 0x00, 0x80), // 5: Purple
    (0x00, 0x80, 0x80), // 6: Teal
    (0xc0, 0xc0, 0xc0), // 7: Silver
    (0x80, 0x80, 0x80), // 8: Gray
    (0xff, 0x00, 0x00), // 9: Red
    (0x00, 0xff, 0x00), // 10: Lime
    (0xff, 0xff, 0x00), // 11: Yellow
    (0x00, 0x00, 0xff), // 12: Blue
    (0xff, 0x00, 0xff), // 13: Fuchsia
    (0x00, 0xff, 0xff), // 14: Aqua
    (0xff, 0xff, 0xff), // 15: White
];

impl Color {
    pub const BLACK: Color = Color::Indexed(0);
    pub const MAROON: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const OLIVE: Color = Color::Indexed(3);
    pub const NAVY: Color = Color::Indexed(4);
    pub const PURPLE: Color = Color::Indexed(5);
    pub const TEAL: Color = Color::Indexed(6);
    pub const SILVER: Color = Color::Indexed(7);
    pub const GRAY: Color = Color::Indexed(8);
    pub const RED: Color = Color::Indexed(9);
    pub const LIME: Color = Color::Indexed(10);
    pub const YELLOW: Color = Color::Indexed(11);
    pub const BLUE: Color = Color::Indexed(12);
    pub const FUCHSIA: Color = Color::Indexed(13);
    pub const AQUA: Color = Color::Indexed(14);
    pub const WHITE: Color = Color::Indexed(15);

    /// Convert a 256-color index to RGB
    pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
        match index {
            0..=15 => PALETTE_16[index as usize],
            // 216 color cube (16-231)
            16..=231 => {
                let n = index - 16;
                let r = n / 36;
                let g = (n % 36) / 6;
                let b = n % 6;
                let to_rgb = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
                (to_rgb(r), to_rgb(g), to_rgb(b))
            }
            // Grayscale (232-255)
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                (gray, gray, gray)
            }
        }
    }

    /// RGB components of this color, or `None` for [`Color::Default`]
    pub fn rgb(self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Default => None,
            Color::Indexed(i) => Some(Self::indexed_to_rgb(i)),
            Color::Rgb(r, g, b) => Some((r, g, b)),
        }
    }

    pub fn is_default(self) -> bool {
        self == Color::Default
    }
}

bitflags! {
    /// Text attributes
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct AttrMask: u16 {
        const BOLD = 1 << 0;
        const BLINK = 1 << 1;
        const REVERSE = 1 << 2;
        const UNDERLINE = 1 << 3;
        const DIM = 1 << 4;
        const ITALIC = 1 << 5;
        const STRIKE_THROUGH = 1 << 6;
        /// Marks a style whose attributes must be ignored
        const INVALID = 1 << 15;
    }
}

/// Foreground, background and attributes of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    fg: Color,
    bg: Color,
    attrs: AttrMask,
}

impl Style {
    /// The sentinel "default" style. Cells carrying it are drawn with the
    /// screen's default style instead.
    pub const DEFAULT: Style = Style {
        fg: Color::Default,
        bg: Color::Default,
        attrs: AttrMask::empty(),
    };

    pub fn new(fg: Color, bg: Color, attrs: AttrMask) -> Self {
        Self { fg, bg, attrs }
    }

    pub fn foreground(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    pub fn background(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    pub fn attributes(self, attrs: AttrMask) -> Self {
        Self { attrs, ..self }
    }

    fn with_attr(self, attr: AttrMask, on: bool) -> Self {
        let mut attrs = self.attrs;
        attrs.set(attr, on);
        Self { attrs, ..self }
    }

    pub fn bold(self, on: bool) -> Self {
        self.with_attr(AttrMask::BOLD, on)
    }

    pub fn dim(self, on: bool) -> Self {
        self.with_attr(AttrMask::DIM, on)
    }

    pub fn italic(self, on: bool) -> Self {
        self.with_attr(AttrMask::ITALIC, on)
    }

    pub fn underline(self, on: bool) -> Self {
        self.with_attr(AttrMask::UNDERLINE, on)
    }

    pub fn strike_through(self, on: bool) -> Self {
        self.with_attr(AttrMask::STRIKE_THROUGH, on)
    }

    pub fn blink(self, on: bool) -> Self {
        self.with_attr(AttrMask::BLINK, on)
    }

    pub fn reverse(self, on: bool) -> Self {
        self.with_attr(AttrMask::REVERSE, on)
    }

    /// Split into foreground, background and attributes
    pub fn decompose(self) -> (Color, Color, AttrMask) {
        (self.fg, self.bg, self.attrs)
    }

    pub fn fg(&self) -> Color {
        self.fg
    }

    pub fn bg(&self) -> Color {
        self.bg
    }

    pub fn attrs(&self) -> AttrMask {
        self.attrs
    }
}
