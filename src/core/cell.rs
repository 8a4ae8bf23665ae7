//! Grid Cell
//!
//! A single cell of the virtual screen: the content written by the
//! application plus the render state resolved from it by the show pass.

use std::sync::Arc;

use crate::geom::Point;
use crate::image::{Image, Rgba};

use super::style::{AttrMask, Style};

/// A single cell in the grid
///
/// `ch`, `combining` and `style` are what the application wrote. The
/// remaining fields are filled in by the show pass and are only meaningful
/// while `synced` is set.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Primary rune; `'\0'` for a cell that was never written
    pub ch: char,
    /// Combining runes drawn over the primary one, in order
    pub combining: Vec<char>,
    pub style: Style,

    pub(crate) synced: bool,
    pub(crate) glyph: Option<Arc<Image>>,
    pub(crate) combining_glyphs: Vec<Arc<Image>>,
    /// Top-left pixel of the cell in logical (untransformed) space
    pub(crate) point: Point,
    pub(crate) fg: Rgba,
    pub(crate) bg: Rgba,
    pub(crate) attrs: AttrMask,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: '\0',
            combining: Vec::new(),
            style: Style::DEFAULT,
            synced: false,
            glyph: None,
            combining_glyphs: Vec::new(),
            point: Point::default(),
            fg: Rgba::WHITE,
            bg: Rgba::BLACK,
            attrs: AttrMask::empty(),
        }
    }
}

impl Cell {
    /// Create a cell holding `ch` with the given style
    pub fn new(ch: char, style: Style) -> Self {
        Self {
            ch,
            style,
            ..Default::default()
        }
    }

    /// Replace the content and mark the cell for re-resolution
    pub fn set(&mut self, ch: char, combining: &[char], style: Style) {
        self.ch = ch;
        self.combining.clear();
        self.combining.extend_from_slice(combining);
        self.style = style;
        self.synced = false;
    }

    /// Whether the show pass has resolved this cell since its last change
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub(crate) fn invalidate(&mut self) {
        self.synced = false;
    }

    /// Resolved primary glyph, if the cell has been shown
    pub fn glyph(&self) -> Option<&Arc<Image>> {
        self.glyph.as_ref()
    }

    pub fn combining_glyphs(&self) -> &[Arc<Image>] {
        &self.combining_glyphs
    }

    /// Resolved foreground and background colors
    pub fn colors(&self) -> (Rgba, Rgba) {
        (self.fg, self.bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Color;

    #[test]
    fn test_default_cell_is_blank() {
        let cell = Cell::default();
        assert_eq!(cell.ch, '\0');
        assert!(cell.combining.is_empty());
        assert_eq!(cell.style, Style::DEFAULT);
        assert!(!cell.is_synced());
        assert!(cell.glyph().is_none());
    }

    #[test]
    fn test_set_clears_synced() {
        let mut cell = Cell::new('a', Style::DEFAULT);
        cell.synced = true;

        let style = Style::DEFAULT.foreground(Color::RED);
        cell.set('e', &['\u{301}'], style);
        assert_eq!(cell.ch, 'e');
        assert_eq!(cell.combining, vec!['\u{301}']);
        assert_eq!(cell.style, style);
        assert!(!cell.is_synced());
    }

    #[test]
    fn test_set_replaces_combining() {
        let mut cell = Cell::default();
        cell.set('a', &['\u{300}', '\u{301}'], Style::DEFAULT);
        cell.set('b', &[], Style::DEFAULT);
        assert!(cell.combining.is_empty());
    }
}
