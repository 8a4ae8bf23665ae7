//! Host-to-terminal key, button and modifier tables

use crate::core::{ButtonMask, Key, ModMask};

use super::{HostButton, HostKey, InputState};

/// Mouse buttons reported in mouse events
pub const BUTTON_MAP: [(HostButton, ButtonMask); 3] = [
    (HostButton::Left, ButtonMask::PRIMARY),
    (HostButton::Middle, ButtonMask::MIDDLE),
    (HostButton::Right, ButtonMask::SECONDARY),
];

/// Modifier keys
pub const MOD_MAP: [(HostKey, ModMask); 4] = [
    (HostKey::Shift, ModMask::SHIFT),
    (HostKey::Control, ModMask::CTRL),
    (HostKey::Alt, ModMask::ALT),
    (HostKey::Meta, ModMask::META),
];

/// Keys that produce a terminal key of their own
pub const KEY_MAP: [(HostKey, Key); 26] = [
    (HostKey::ArrowDown, Key::Down),
    (HostKey::ArrowLeft, Key::Left),
    (HostKey::ArrowRight, Key::Right),
    (HostKey::ArrowUp, Key::Up),
    (HostKey::Backspace, Key::Backspace),
    (HostKey::Delete, Key::Delete),
    (HostKey::End, Key::End),
    (HostKey::Enter, Key::Enter),
    (HostKey::Escape, Key::Escape),
    (HostKey::F(1), Key::F(1)),
    (HostKey::F(2), Key::F(2)),
    (HostKey::F(3), Key::F(3)),
    (HostKey::F(4), Key::F(4)),
    (HostKey::F(5), Key::F(5)),
    (HostKey::F(6), Key::F(6)),
    (HostKey::F(7), Key::F(7)),
    (HostKey::F(8), Key::F(8)),
    (HostKey::F(9), Key::F(9)),
    (HostKey::F(10), Key::F(10)),
    (HostKey::F(11), Key::F(11)),
    (HostKey::F(12), Key::F(12)),
    (HostKey::Home, Key::Home),
    (HostKey::Insert, Key::Insert),
    (HostKey::PageDown, Key::PgDn),
    (HostKey::PageUp, Key::PgUp),
    (HostKey::Tab, Key::Tab),
];

/// Terminal key for a special host key
pub fn special_key(key: HostKey) -> Option<Key> {
    KEY_MAP.iter().find(|(h, _)| *h == key).map(|(_, k)| *k)
}

/// Host key producing a special terminal key
pub fn host_key_for(key: Key) -> Option<HostKey> {
    KEY_MAP.iter().find(|(_, k)| *k == key).map(|(h, _)| *h)
}

/// Modifiers currently held
pub fn mod_mask(input: &dyn InputState) -> ModMask {
    MOD_MAP
        .iter()
        .filter(|(key, _)| input.is_key_pressed(*key))
        .fold(ModMask::empty(), |mods, (_, m)| mods | *m)
}

/// Whether a key held for `duration` ticks fires this tick
///
/// Fires on the first tick, then after a 500 ms delay every 50 ms, with
/// times converted to ticks at `tps`. A rate too low to give a non-zero
/// interval uses 30 ticks of delay and 3 of interval.
pub fn is_key_just_pressed_or_repeating(duration: u32, tps: f64) -> bool {
    let tps = if tps.is_finite() && tps > 0.0 { tps } else { 0.0 };
    let mut delay = (0.5 * tps) as u32;
    let mut interval = (0.05 * tps) as u32;
    if interval == 0 {
        delay = 30;
        interval = 3;
    }

    if duration == 1 {
        return true;
    }
    duration >= delay && (duration - delay) % interval == 0
}
