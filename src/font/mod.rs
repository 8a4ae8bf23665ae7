//! Glyph Faces
//!
//! A [`Face`] turns a `(char, FontStyle)` pair into a fixed-size cell bitmap.
//! Bitmaps are cached per rune and handed out as shared [`Arc<Image>`]s, so
//! asking twice for the same rune returns the same allocation.
//!
//! Faces compose: [`FaceWithOnlyRunes`], [`FaceWithRuneMapping`],
//! [`FaceWithBackup`] and [`FaceWithStyle`] each own an inner face and only
//! change which rune or style reaches it.

mod cache;
mod compose;
mod error;
mod mono;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::AttrMask;
use crate::image::Image;

pub use cache::CacheFont;
#[cfg(test)]
pub(crate) use cache::block_face;
pub use compose::{FaceWithBackup, FaceWithOnlyRunes, FaceWithRuneMapping, FaceWithStyle};
pub use error::FontError;
pub use mono::MonoFont;

/// Point size used when none is configured
pub const DEFAULT_FONT_SIZE: f32 = 11.0;

/// Style variant a glyph is requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// Pick the variant implied by the bold and italic attributes
    pub fn from_attrs(attrs: AttrMask) -> Self {
        match (
            attrs.contains(AttrMask::BOLD),
            attrs.contains(AttrMask::ITALIC),
        ) {
            (true, true) => FontStyle::BoldItalic,
            (false, true) => FontStyle::Italic,
            (true, false) => FontStyle::Bold,
            (false, false) => FontStyle::Normal,
        }
    }
}

/// Vertical font metrics, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_height: f32,
}

/// A monospaced glyph source
pub trait Face: Send {
    /// Cell size in pixels, `(width, height)`
    fn size(&self) -> (usize, usize);

    /// Bitmap for `ch`. The flag is `true` when the face has no glyph for
    /// `ch` and the shared empty bitmap was returned instead.
    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool);

    /// The shared blank bitmap
    fn empty(&self) -> Arc<Image>;

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        !self.glyph(ch, style).1
    }
}

impl<F: Face + ?Sized> Face for Box<F> {
    fn size(&self) -> (usize, usize) {
        (**self).size()
    }

    fn glyph(&mut self, ch: char, style: FontStyle) -> (Arc<Image>, bool) {
        (**self).glyph(ch, style)
    }

    fn empty(&self) -> Arc<Image> {
        (**self).empty()
    }

    fn has_glyph(&mut self, ch: char, style: FontStyle) -> bool {
        (**self).has_glyph(ch, style)
    }
}

/// Where a [`MonoFont`] loads its TrueType data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// First installed system monospace font
    System,
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl FromStr for FontSource {
    type Err = FontError;

    /// `"system"` (or empty) and `"file:<path>"` are understood
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "system" => Ok(FontSource::System),
            _ => match s.strip_prefix("file:") {
                Some(path) if !path.is_empty() => Ok(FontSource::Path(PathBuf::from(path))),
                _ => Err(FontError::UnknownSource(s.to_string())),
            },
        }
    }
}
