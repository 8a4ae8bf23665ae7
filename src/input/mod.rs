//! Input Translation
//!
//! The frame loop reports raw input each tick: a pixel pointer position,
//! held buttons and keys with how long they have been held, wheel deltas and
//! the characters typed this tick. This module turns that into terminal
//! events.
//!
//! # Keyboard
//!
//! - Typed characters become rune keys, with Shift dropped from the mods
//! - With Ctrl held, letter keys become `Key::Ctrl(letter)` instead
//! - Keys in the special-key table repeat after 500 ms, every 50 ms
//!
//! # Mouse
//!
//! The pointer is mapped through the inverse draw transform, then to cells
//! by dividing by the cell size (or proportionally onto a configured cell
//! rectangle).

mod keymap;
mod translate;

pub use keymap::{
    host_key_for, is_key_just_pressed_or_repeating, mod_mask, special_key, BUTTON_MAP, KEY_MAP,
    MOD_MAP,
};
pub(crate) use translate::update;

/// A physical key on the host keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostKey {
    /// Letter key, uppercase `'A'..='Z'`
    Letter(char),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Backspace,
    Delete,
    End,
    Enter,
    Escape,
    /// Function key `F1..=F12`
    F(u8),
    Home,
    Insert,
    PageDown,
    PageUp,
    Tab,
    Shift,
    Control,
    Alt,
    Meta,
}

/// A host mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostButton {
    Left,
    Middle,
    Right,
}

/// Raw input state for one frame tick
pub trait InputState {
    /// Pointer position in window pixels
    fn cursor_position(&self) -> (f64, f64);

    fn is_mouse_button_pressed(&self, button: HostButton) -> bool;

    /// Wheel movement this tick, `(x, y)`; positive y scrolls up
    fn wheel(&self) -> (f64, f64);

    /// Ticks `key` has been held, counting this one; 0 when released
    fn key_press_duration(&self, key: HostKey) -> u32;

    /// Keys held this tick
    fn pressed_keys(&self) -> Vec<HostKey>;

    /// Characters typed this tick
    fn input_chars(&self) -> &[char];

    /// Measured ticks per second
    fn actual_tps(&self) -> f64;

    fn is_key_pressed(&self, key: HostKey) -> bool {
        self.key_press_duration(key) > 0
    }
}

/// A recorded [`InputState`]
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub cursor: (f64, f64),
    pub buttons: Vec<HostButton>,
    pub wheel: (f64, f64),
    /// Held keys and their press durations in ticks
    pub keys: Vec<(HostKey, u32)>,
    pub chars: Vec<char>,
    pub tps: f64,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            cursor: (-1.0, -1.0),
            buttons: Vec::new(),
            wheel: (0.0, 0.0),
            keys: Vec::new(),
            chars: Vec::new(),
            tps: 60.0,
        }
    }
}

impl InputSnapshot {
    /// No input, pointer outside the window
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursor(mut self, x: f64, y: f64) -> Self {
        self.cursor = (x, y);
        self
    }

    pub fn with_button(mut self, button: HostButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_wheel(mut self, x: f64, y: f64) -> Self {
        self.wheel = (x, y);
        self
    }

    /// Hold `key` for `duration` ticks
    pub fn with_key(mut self, key: HostKey, duration: u32) -> Self {
        self.keys.retain(|(k, _)| *k != key);
        self.keys.push((key, duration));
        self
    }

    pub fn with_chars(mut self, chars: &str) -> Self {
        self.chars.extend(chars.chars());
        self
    }

    pub fn with_tps(mut self, tps: f64) -> Self {
        self.tps = tps;
        self
    }
}

impl InputState for InputSnapshot {
    fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    fn is_mouse_button_pressed(&self, button: HostButton) -> bool {
        self.buttons.contains(&button)
    }

    fn wheel(&self) -> (f64, f64) {
        self.wheel
    }

    fn key_press_duration(&self, key: HostKey) -> u32 {
        self.keys
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(0, |(_, d)| *d)
    }

    fn pressed_keys(&self) -> Vec<HostKey> {
        self.keys
            .iter()
            .filter(|(_, d)| *d > 0)
            .map(|(k, _)| *k)
            .collect()
    }

    fn input_chars(&self) -> &[char] {
        &self.chars
    }

    fn actual_tps(&self) -> f64 {
        self.tps
    }
}
