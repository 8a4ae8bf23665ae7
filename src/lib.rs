//! Cellframe
//!
//! Runs a character-grid terminal UI inside a pixel-based frame loop. The
//! application draws into a virtual [`Screen`] and polls terminal events;
//! a frame host drives the [`Game`] adapter, which renders the grid with a
//! monospace glyph face and turns host input into terminal events.
//!
//! - `core`: cells, grid, styles, cursor, events and the bounded event queue
//! - `geom`, `image`: points, rectangles, affine transforms and RGBA images
//! - `font`: glyph faces, the glyph cache and face combinators
//! - `screen`: the application-side terminal surface
//! - `render`: resolving cells to glyphs and drawing them
//! - `input`: host input model and translation to terminal events
//! - `game`: the frame-loop adapter
//! - `terminal`: lifecycle and configuration facade
//! - `host`: headless and windowed (feature `gui`) frame hosts
//! - `config`: JSON configuration

pub mod config;
pub mod core;
pub mod error;
pub mod font;
pub mod game;
pub mod geom;
pub mod host;
pub mod image;
pub mod input;
pub mod render;
pub mod screen;
pub mod terminal;

pub use config::{Config, ConfigError};
pub use core::{AttrMask, Color, CursorStyle, Event, Key, ModMask, MouseFlags, Style};
pub use error::{Error, Result};
pub use font::{Face, FontError, FontSource, FontStyle, MonoFont};
pub use game::{FrameGame, Game};
pub use geom::{GeoM, Point, Rect};
pub use host::{FrameHost, HeadlessHost};
pub use image::{Image, Rgba};
pub use input::{HostButton, HostKey, InputSnapshot, InputState};
pub use screen::Screen;
pub use terminal::Terminal;
