//! Cursor state
//!
//! A single cursor: position, shape and color. A position outside the grid
//! (conventionally `(-1, -1)`) means the cursor is hidden.

use serde::{Deserialize, Serialize};

use super::style::Color;

/// Cursor shape and blink behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorStyle {
    /// Full block, never blinks
    #[default]
    Default,
    BlinkingBlock,
    SteadyBlock,
    BlinkingUnderline,
    SteadyUnderline,
    BlinkingBar,
    SteadyBar,
}

/// The drawn shape of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    /// Full cell painted in the cursor color
    Solid,
    /// Full cell inverting what is underneath
    Block,
    Underline,
    Bar,
}

impl CursorStyle {
    pub fn shape(self) -> CursorShape {
        match self {
            CursorStyle::Default => CursorShape::Solid,
            CursorStyle::BlinkingBlock | CursorStyle::SteadyBlock => CursorShape::Block,
            CursorStyle::BlinkingUnderline | CursorStyle::SteadyUnderline => {
                CursorShape::Underline
            }
            CursorStyle::BlinkingBar | CursorStyle::SteadyBar => CursorShape::Bar,
        }
    }

    pub fn blinks(self) -> bool {
        matches!(
            self,
            CursorStyle::BlinkingBlock | CursorStyle::BlinkingUnderline | CursorStyle::BlinkingBar
        )
    }
}

/// Cursor position, style and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
    pub style: CursorStyle,
    /// `Color::Default` draws white
    pub color: Color,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: -1,
            y: -1,
            style: CursorStyle::Default,
            color: Color::Default,
        }
    }
}

impl Cursor {
    pub fn show(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn hide(&mut self) {
        self.show(-1, -1);
    }

    /// Whether the cursor lies inside a `cols` x `rows` grid
    pub fn is_visible_in(&self, cols: usize, rows: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < cols && (self.y as usize) < rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_starts_hidden() {
        let cursor = Cursor::default();
        assert_eq!((cursor.x, cursor.y), (-1, -1));
        assert!(!cursor.is_visible_in(80, 24));
    }

    #[test]
    fn test_show_and_hide() {
        let mut cursor = Cursor::default();
        cursor.show(3, 4);
        assert!(cursor.is_visible_in(80, 24));
        assert!(!cursor.is_visible_in(3, 24));
        cursor.hide();
        assert!(!cursor.is_visible_in(80, 24));
    }

    #[test]
    fn test_style_shapes() {
        assert_eq!(CursorStyle::Default.shape(), CursorShape::Solid);
        assert_eq!(CursorStyle::BlinkingBlock.shape(), CursorShape::Block);
        assert_eq!(CursorStyle::SteadyUnderline.shape(), CursorShape::Underline);
        assert_eq!(CursorStyle::BlinkingBar.shape(), CursorShape::Bar);
        assert!(!CursorStyle::Default.blinks());
        assert!(!CursorStyle::SteadyBlock.blinks());
        assert!(CursorStyle::BlinkingUnderline.blinks());
    }

    #[test]
    fn test_style_serde_names() {
        let json = serde_json::to_string(&CursorStyle::BlinkingBar).unwrap();
        assert_eq!(json, "\"blinking-bar\"");
        let style: CursorStyle = serde_json::from_str("\"steady-block\"").unwrap();
        assert_eq!(style, CursorStyle::SteadyBlock);
    }
}
