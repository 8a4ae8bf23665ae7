//! Core Screen Model
//!
//! Platform-independent pieces of the virtual screen:
//! - Styles, colors and attributes
//! - Cells and the flat cell grid
//! - Cursor position and shape
//! - Events and the bounded event queue
//!
//! Nothing here knows about fonts, pixels or the host frame loop.

mod cell;
mod cursor;
mod event;
mod grid;
mod queue;
mod style;

pub use cell::Cell;
pub use cursor::{Cursor, CursorShape, CursorStyle};
pub use event::{ButtonMask, Event, Key, ModMask, MouseFlags};
pub use grid::Grid;
pub use queue::{EventQueue, Poll, EVENT_QUEUE_CAPACITY};
pub use style::{AttrMask, Color, Style};
