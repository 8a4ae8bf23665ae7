//! Terminal Events
//!
//! Events delivered to the application through the screen's event queue.

use std::time::Instant;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A key as seen by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal typed character
    Rune(char),
    /// Ctrl plus a letter, always lowercase `'a'..='z'`
    Ctrl(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PgUp,
    PgDn,
    Insert,
    Delete,
    Backspace,
    Tab,
    Enter,
    Escape,
    /// Function key `F1..=F12`
    F(u8),
}

bitflags! {
    /// Modifier keys held during an event
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ModMask: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

bitflags! {
    /// Mouse buttons and wheel directions
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u16 {
        const PRIMARY = 1 << 0;
        const SECONDARY = 1 << 1;
        const MIDDLE = 1 << 2;
        const WHEEL_UP = 1 << 8;
        const WHEEL_DOWN = 1 << 9;
        const WHEEL_LEFT = 1 << 10;
        const WHEEL_RIGHT = 1 << 11;
    }
}

bitflags! {
    /// Which mouse activity is reported
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MouseFlags: u8 {
        const BUTTON_EVENTS = 1 << 0;
        const DRAG_EVENTS = 1 << 1;
        const MOTION_EVENTS = 1 << 2;
    }
}

/// An event delivered to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The grid was reallocated to `cols` x `rows`
    Resize { cols: usize, rows: usize },
    Focus { focused: bool },
    /// Pointer state in cell coordinates
    Mouse {
        x: i32,
        y: i32,
        buttons: ButtonMask,
        mods: ModMask,
    },
    Key { key: Key, mods: ModMask },
    /// Start (`true`) or end of a bracketed paste
    Paste { start: bool },
    /// Idle tick, posted when nothing else happened in a frame
    Time { when: Instant },
}

impl Event {
    pub fn key(key: Key, mods: ModMask) -> Self {
        Event::Key { key, mods }
    }

    pub fn rune(ch: char) -> Self {
        Event::Key {
            key: Key::Rune(ch),
            mods: ModMask::empty(),
        }
    }

    pub fn time() -> Self {
        Event::Time {
            when: Instant::now(),
        }
    }

    pub fn is_time(&self) -> bool {
        matches!(self, Event::Time { .. })
    }
}
