//! Monospaced TrueType face
//!
//! Rasterizes glyphs with fontdue into white-on-transparent cell bitmaps.
//! The cell size comes from the full-block rune `█` (or `M` when the font
//! lacks it).

use std::path::Path;
use std::sync::Arc;

use fontdue::{Font, FontSettings};

use crate::image::{Image, Rgba};

use super::{CacheFont, Face, FaceMetrics, FontError, FontSource, FontStyle, DEFAULT_FONT_SIZE};

/// Reference rune for the nominal cell box
const REFERENCE_RUNE: char = '█';
const FALLBACK_REFERENCE_RUNE: char = 'M';

/// System monospace fonts, in order of preference
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/ubuntu/UbuntuMono-R.ttf",
    "/usr/share/fonts/truetype/freefont/FreeMono.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "C:\\Windows\\Fonts\\consola.ttf",
];

/// A monospaced face rendered from a TrueType font
pub struct MonoFont {
    font: Font,
    font_size: f32,
    cache: CacheFont,
}

impl std::fmt::Debug for MonoFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonoFont")
            .field("font_size", &self.font_size)
            .field("size", &self.cache.size())
            .finish_non_exhaustive()
    }
}

impl MonoFont {
    /// Load from a [`FontSource`]
    pub fn new(source: FontSource, font_size: f32) -> Result<Self, FontError> {
        match source {
            FontSource::System => Self::with_default_font(font_size),
            FontSource::Bytes(data) => Self::from_bytes(&data, font_size),
            FontSource::Path(path) => Self::from_path(&path, font_size),
        }
    }

    pub fn from_path(path: &Path, font_size: f32) -> Result<Self, FontError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, font_size)
    }

    /// Parse TrueType data. A non-positive size selects [`DEFAULT_FONT_SIZE`].
    pub fn from_bytes(data: &[u8], font_size: f32) -> Result<Self, FontError> {
        let font_size = if font_size > 0.0 && font_size.is_finite() {
            font_size
        } else {
            DEFAULT_FONT_SIZE
        };
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| FontError::Parse(e.to_string()))?;

        let reference = if font.lookup_glyph_index(REFERENCE_RUNE) != 0 {
            REFERENCE_RUNE
        } else {
            FALLBACK_REFERENCE_RUNE
        };
        let width = (font.metrics(reference, font_size).advance_width as usize).max(1);

        let line = font
            .horizontal_line_metrics(font_size)
            .ok_or_else(|| FontError::Parse("no horizontal line metrics".to_string()))?;
        let height = (line.new_line_size as usize).max(1);

        let metrics = FaceMetrics {
            ascent: line.ascent,
            descent: line.descent,
            line_height: line.new_line_size,
        };
        tracing::debug!(font_size, width, height, "loaded monospace font");

        Ok(Self {
            font,
            font_size,
            cache: CacheFont::new(width, height, metrics),
        })
    }

    /// Load the first system monospace font that parses
    pub fn with_default_font(font_size: f32) -> Result<Self, FontError> {
        for path in SYSTEM_FONT_PATHS {
            match Self::from_path(Path::new(path), font_size) {
                Ok(face) => {
                    tracing::info!("Loaded font: {}", path);
                    return Ok(face);
                }
                Err(e) => tracing::trace!("Skipping font {}: {}", path, e),
            }
        }
        Err(FontError::NoFontFound)
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Vertical metrics at the loaded size
    pub fn metrics(&self) -> FaceMetrics {
        self.cache.metrics()
    }

    fn render(&self, ch: char) -> Image {
        let (width, height) = self.cache.size();
        let mut image = Image::new(width, height);
        let (metrics, coverage) = self.font.rasterize(ch, self.font_size);
        let left = metrics.xmin;
        let baseline = self.metrics().ascent.round() as i32;
        let top = baseline - (metrics.ymin + metrics.height as i32);

        for row in 0..metrics.height {
            let y = top + row as i32;
            if y < 0 {
                continue;
            }
            for col in 0..metrics.width {
                let x = left + col as i32;
                let alpha = coverage[row * metrics.width + col];
                if x < 0 || alpha == 0 {
                    continue;
                }
                image.set_pixel(x as usize, y as usize, Rgba::new(255, 255, 255, alpha));
            }
        }
        image
    }
}

impl Face for MonoFont {
    fn size(&self) -> (usize, usize) {
        self.cache.size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        if self.cache.lookup(ch).is_none() {
            let glyph = if self.font.lookup_glyph_index(ch) != 0 {
                Some(self.render(ch))
            } else {
                None
            };
            // Rendered glyphs always match the cell size
            if let Err(e) = self.cache.set_glyph(ch, glyph) {
                tracing::warn!("dropping glyph for {:?}: {}", ch, e);
            }
        }
        self.cache.glyph(ch, style)
    }

    fn empty(&self) -> Arc<Image> {
        self.cache.empty()
    }

    fn has_glyph(&mut self, ch: char, _style: FontStyle) -> bool {
        match self.cache.lookup(ch) {
            Some(glyph) => glyph.is_some(),
            None => self.font.lookup_glyph_index(ch) != 0,
        }
    }
}
