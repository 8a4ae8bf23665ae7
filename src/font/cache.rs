//! Glyph cache face
//!
//! A face backed only by its cache. Glyphs are set explicitly; any rune
//! never set resolves to the shared empty bitmap.

use std::collections::HashMap;
use std::sync::Arc;

use crate::image::Image;

use super::{Face, FaceMetrics, FontError, FontStyle};

/// A face whose glyphs are supplied by [`set_glyph`](CacheFont::set_glyph)
#[derive(Debug, Clone)]
pub struct CacheFont {
    metrics: FaceMetrics,
    width: usize,
    height: usize,
    /// `None` records a rune known to have no glyph
    cache: HashMap<char, Option<Arc<Image>>>,
    empty: Arc<Image>,
}

impl CacheFont {
    pub fn new(width: usize, height: usize, metrics: FaceMetrics) -> Self {
        Self {
            metrics,
            width,
            height,
            cache: HashMap::new(),
            empty: Arc::new(Image::new(width, height)),
        }
    }

    /// Store a glyph for `ch`, or record that it has none
    pub fn set_glyph(&mut self, ch: char, glyph: Option<Image>) -> Result<(), FontError> {
        if let Some(image) = &glyph {
            let (w, h) = image.size();
            if (w, h) != (self.width, self.height) {
                return Err(FontError::InvalidGlyphSize {
                    got_w: w,
                    got_h: h,
                    want_w: self.width,
                    want_h: self.height,
                });
            }
        }
        self.cache.insert(ch, glyph.map(Arc::new));
        Ok(())
    }

    /// Cached lookup: `None` on a miss, `Some(None)` for a known-missing rune
    pub(crate) fn lookup(&self, ch: char) -> Option<Option<Arc<Image>>> {
        self.cache.get(&ch).cloned()
    }

    /// Number of runes resolved so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }
}

impl Face for CacheFont {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn glyph(&mut self, ch: char, _style: FontStyle) -> (Arc<Image>, bool) {
        match self.cache.entry(ch).or_insert(None) {
            Some(glyph) => (Arc::clone(glyph), false),
            None => (Arc::clone(&self.empty), true),
        }
    }

    fn empty(&self) -> Arc<Image> {
        Arc::clone(&self.empty)
    }

    fn has_glyph(&mut self, ch: char, _style: FontStyle) -> bool {
        matches!(self.cache.get(&ch), Some(Some(_)))
    }
}

/// A `width` x `height` face with a solid white glyph for each of `runes`
#[cfg(test)]
pub(crate) fn block_face(width: usize, height: usize, runes: &str) -> CacheFont {
    use crate::image::Rgba;

    let mut face = CacheFont::new(
        width,
        height,
        FaceMetrics {
            ascent: height as f32,
            descent: 0.0,
            line_height: height as f32,
        },
    );
    for ch in runes.chars() {
        face.set_glyph(ch, Some(Image::filled(width, height, Rgba::WHITE)))
            .unwrap();
    }
    face
}
