//! Composable faces
//!
//! Each wrapper owns an inner face and delegates to it, changing only which
//! rune or style reaches it or which face answers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::image::Image;

use super::{Face, FontStyle};

/// Restricts a face to an allowlist of runes
#[derive(Debug)]
pub struct FaceWithOnlyRunes<F> {
    face: F,
    runes: HashSet<char>,
}

impl<F: Face> FaceWithOnlyRunes<F> {
    pub fn new(face: F, runes: impl IntoIterator<Item = char>) -> Self {
        Self {
            face,
            runes: runes.into_iter().collect(),
        }
    }

    pub fn into_inner(self) -> F {
        self.face
    }
}

impl<F: Face> Face for FaceWithOnlyRunes<F> {
    fn size(&self) -> (usize, usize) {
        self.face.size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        if self.runes.contains(&ch) {
            self.face.glyph(ch, style)
        } else {
            (self.face.empty(), true)
        }
    }

    fn empty(&self) -> Arc<Image> {
        self.face.empty()
    }

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        self.runes.contains(&ch) && self.face.has_glyph(ch, style)
    }
}

/// Replaces runes before they reach the inner face
#[derive(Debug)]
pub struct FaceWithRuneMapping<F> {
    face: F,
    mapping: HashMap<char, char>,
}

impl<F: Face> FaceWithRuneMapping<F> {
    pub fn new(face: F, mapping: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            face,
            mapping: mapping.into_iter().collect(),
        }
    }

    fn map(&self, ch: char) -> char {
        self.mapping.get(&ch).copied().unwrap_or(ch)
    }
}

impl<F: Face> Face for FaceWithRuneMapping<F> {
    fn size(&self) -> (usize, usize) {
        self.face.size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        let ch = self.map(ch);
        self.face.glyph(ch, style)
    }

    fn empty(&self) -> Arc<Image> {
        self.face.empty()
    }

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        let ch = self.map(ch);
        self.face.has_glyph(ch, style)
    }
}

/// Asks `backup` for runes the primary face lacks
///
/// Size and the empty glyph come from the primary face.
#[derive(Debug)]
pub struct FaceWithBackup<F, B> {
    face: F,
    backup: B,
}

impl<F: Face, B: Face> FaceWithBackup<F, B> {
    pub fn new(face: F, backup: B) -> Self {
        Self { face, backup }
    }
}

impl<F: Face, B: Face> Face for FaceWithBackup<F, B> {
    fn size(&self) -> (usize, usize) {
        self.face.size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        let (glyph, empty) = self.face.glyph(ch, style);
        if !empty {
            return (glyph, false);
        }
        self.backup.glyph(ch, style)
    }

    fn empty(&self) -> Arc<Image> {
        self.face.empty()
    }

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        self.face.has_glyph(ch, style) || self.backup.has_glyph(ch, style)
    }
}

/// Selects a face per style
///
/// Missing styles fall back: bold-italic to italic, then bold, then normal;
/// italic and bold each to normal. The requested style is passed unchanged
/// to whichever face answers.
pub struct FaceWithStyle {
    normal: Box<dyn Face>,
    styled: HashMap<FontStyle, Box<dyn Face>>,
}

impl std::fmt::Debug for FaceWithStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceWithStyle")
            .field("styles", &self.styled.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl FaceWithStyle {
    pub fn new(normal: impl Face + 'static) -> Self {
        Self {
            normal: Box::new(normal),
            styled: HashMap::new(),
        }
    }

    /// Register `face` for `style`, replacing any previous one
    pub fn with_style(mut self, style: FontStyle, face: impl Face + 'static) -> Self {
        if style == FontStyle::Normal {
            self.normal = Box::new(face);
        } else {
            self.styled.insert(style, Box::new(face));
        }
        self
    }

    /// Build from a complete style map
    ///
    /// # Panics
    ///
    /// Panics if `map` has no [`FontStyle::Normal`] entry.
    pub fn from_map(mut map: HashMap<FontStyle, Box<dyn Face>>) -> Self {
        let Some(normal) = map.remove(&FontStyle::Normal) else {
            panic!("FaceWithStyle requires a FontStyle::Normal face");
        };
        Self {
            normal,
            styled: map,
        }
    }

    /// The style whose face answers requests for `style`
    pub fn resolve(&self, style: FontStyle) -> FontStyle {
        let chain: &[FontStyle] = match style {
            FontStyle::Normal => &[],
            FontStyle::Italic => &[FontStyle::Italic],
            FontStyle::Bold => &[FontStyle::Bold],
            FontStyle::BoldItalic => &[FontStyle::BoldItalic, FontStyle::Italic, FontStyle::Bold],
        };
        chain
            .iter()
            .copied()
            .find(|s| self.styled.contains_key(s))
            .unwrap_or(FontStyle::Normal)
    }

    fn face_mut(&mut self, style: FontStyle) -> &mut Box<dyn Face> {
        let key = self.resolve(style);
        match self.styled.get_mut(&key) {
            Some(face) => face,
            None => &mut self.normal,
        }
    }
}

impl Face for FaceWithStyle {
    fn size(&self) -> (usize, usize) {
        self.normal.size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        self.face_mut(style).glyph(ch, style)
    }

    fn empty(&self) -> Arc<Image> {
        self.normal.empty()
    }

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        self.face_mut(style).has_glyph(ch, style)
    }
}

#[cfg(test)]
mod tests {
    use super::super::cache::block_face;
    use super::*;

    #[test]
    fn test_only_runes() {
        let mut face = FaceWithOnlyRunes::new(block_face(2, 3, "abc"), "ab".chars());
        assert!(!face.glyph('a', FontStyle::Normal).1);
        assert!(face.glyph('c', FontStyle::Normal).1);
        assert!(!face.has_glyph('c', FontStyle::Normal));
        let (empty, _) = face.glyph('c', FontStyle::Normal);
        assert!(Arc::ptr_eq(&empty, &face.empty()));
    }

    #[test]
    fn test_rune_mapping() {
        let mut inner = block_face(2, 3, "o");
        let (o, _) = inner.glyph('o', FontStyle::Normal);
        let mut face = FaceWithRuneMapping::new(inner, [('ø', 'o')]);
        let (mapped, empty) = face.glyph('ø', FontStyle::Normal);
        assert!(!empty);
        assert!(Arc::ptr_eq(&o, &mapped));
        assert!(face.has_glyph('ø', FontStyle::Normal));
    }

    #[test]
    fn test_backup_answers_missing_runes() {
        let mut backup = block_face(2, 3, "b");
        let (b, _) = backup.glyph('b', FontStyle::Normal);
        let mut face = FaceWithBackup::new(block_face(2, 3, "a"), backup);

        assert!(!face.glyph('a', FontStyle::Normal).1);
        let (from_backup, empty) = face.glyph('b', FontStyle::Normal);
        assert!(!empty);
        assert!(Arc::ptr_eq(&b, &from_backup));
        assert!(face.glyph('c', FontStyle::Normal).1);
    }

    #[test]
    fn test_style_fallback_with_normal_and_bold() {
        let face = FaceWithStyle::new(block_face(2, 3, "n"))
            .with_style(FontStyle::Bold, block_face(2, 3, "b"));
        assert_eq!(face.resolve(FontStyle::Normal), FontStyle::Normal);
        assert_eq!(face.resolve(FontStyle::Bold), FontStyle::Bold);
        assert_eq!(face.resolve(FontStyle::Italic), FontStyle::Normal);
        assert_eq!(face.resolve(FontStyle::BoldItalic), FontStyle::Bold);
    }

    #[test]
    fn test_style_fallback_prefers_italic() {
        let face = FaceWithStyle::new(block_face(2, 3, ""))
            .with_style(FontStyle::Bold, block_face(2, 3, ""))
            .with_style(FontStyle::Italic, block_face(2, 3, ""));
        assert_eq!(face.resolve(FontStyle::BoldItalic), FontStyle::Italic);
    }

    #[test]
    fn test_style_selects_face() {
        let mut face = FaceWithStyle::new(block_face(2, 3, "n"))
            .with_style(FontStyle::Bold, block_face(2, 3, "b"));
        assert!(!face.glyph('n', FontStyle::Normal).1);
        assert!(face.glyph('n', FontStyle::Bold).1);
        assert!(!face.glyph('b', FontStyle::BoldItalic).1);
        assert!(!face.glyph('n', FontStyle::Italic).1);
    }

    #[test]
    #[should_panic(expected = "FontStyle::Normal")]
    fn test_from_map_without_normal_panics() {
        let mut map: HashMap<FontStyle, Box<dyn Face>> = HashMap::new();
        map.insert(FontStyle::Bold, Box::new(block_face(2, 3, "")));
        let _ = FaceWithStyle::from_map(map);
    }
}
