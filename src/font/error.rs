//! Error types for font loading

use std::io;
use thiserror::Error;

/// Font error type
#[derive(Error, Debug)]
pub enum FontError {
    /// The font source string names no known source type
    #[error("unknown font source type: {0:?}")]
    UnknownSource(String),

    /// I/O error reading a font file
    #[error("font I/O error: {0}")]
    Io(#[from] io::Error),

    /// The font data could not be parsed
    #[error("font parse error: {0}")]
    Parse(String),

    /// No usable system monospace font was found
    #[error("no suitable font found")]
    NoFontFound,

    /// A glyph bitmap does not match the face's cell size
    #[error("invalid glyph size {got_w}x{got_h} for {want_w}x{want_h} font")]
    InvalidGlyphSize {
        got_w: usize,
        got_h: usize,
        want_w: usize,
        want_h: usize,
    },
}
