//! Per-tick input translation

use crate::core::{ButtonMask, Event, EventQueue, Key, ModMask};
use crate::geom::{GeoM, Point, Rect};
use crate::screen::ScreenState;

use super::keymap::{is_key_just_pressed_or_repeating, mod_mask, special_key, BUTTON_MAP};
use super::{HostKey, InputState};

/// Map a logical pixel inside `region` to a cell
fn cell_of(state: &ScreenState, region: Rect, p: Point) -> Point {
    let cells = state.mouse_cells;
    if cells.is_empty() || region.is_empty() {
        let (cw, ch) = state.cell_size;
        return Point::new(p.x.div_euclid(cw as i32), p.y.div_euclid(ch as i32));
    }
    let scale = |offset: i32, cell_span: i32, pixel_span: i32| {
        (offset as i64 * cell_span as i64 / pixel_span as i64) as i32
    };
    Point::new(
        cells.min.x + scale(p.x - region.min.x, cells.width(), region.width()),
        cells.min.y + scale(p.y - region.min.y, cells.height(), region.height()),
    )
}

fn wheel_buttons(x: f64, y: f64) -> ButtonMask {
    let mut buttons = ButtonMask::empty();
    if x < 0.0 {
        buttons |= ButtonMask::WHEEL_LEFT;
    }
    if x > 0.0 {
        buttons |= ButtonMask::WHEEL_RIGHT;
    }
    if y < 0.0 {
        buttons |= ButtonMask::WHEEL_DOWN;
    }
    if y > 0.0 {
        buttons |= ButtonMask::WHEEL_UP;
    }
    buttons
}

/// Translate one tick of host input into events
///
/// Posts at most one coherent batch: focus gain, a mouse event and key
/// events while the pointer is inside the capture regions; focus loss when
/// it leaves them; otherwise a time event.
pub(crate) fn update(
    state: &mut ScreenState,
    queue: &EventQueue,
    geom: &GeoM,
    input: &dyn InputState,
) {
    let inverse = geom.inverted().unwrap_or_default();
    let (cx, cy) = input.cursor_position();
    let (mx, my) = inverse.apply(cx, cy);
    let pointer = Point::new(mx.floor() as i32, my.floor() as i32);

    let mods = mod_mask(input);
    let mut in_focus = false;
    let mut posted = false;

    let mouse_region = if state.mouse_capture.is_empty() {
        state.layout
    } else {
        state.mouse_capture
    };
    if mouse_region.contains(pointer) {
        if !state.focused {
            state.post(queue, Event::Focus { focused: true });
            state.focused = true;
        }

        let mut buttons = BUTTON_MAP
            .iter()
            .filter(|(button, _)| input.is_mouse_button_pressed(*button))
            .fold(ButtonMask::empty(), |mask, (_, b)| mask | *b);
        let (wx, wy) = input.wheel();
        buttons |= wheel_buttons(wx, wy);

        let cell = cell_of(state, mouse_region, pointer);
        state.post(
            queue,
            Event::Mouse {
                x: cell.x,
                y: cell.y,
                buttons,
                mods,
            },
        );
        in_focus = true;
        posted = true;
    }

    let key_region = if state.key_capture.is_empty() {
        state.layout
    } else {
        state.key_capture
    };
    if key_region.contains(pointer) {
        if !state.focused {
            state.post(queue, Event::Focus { focused: true });
            state.focused = true;
        }

        let tps = input.actual_tps();
        let pressed = input.pressed_keys();
        if mods.contains(ModMask::CTRL) {
            for key in &pressed {
                let HostKey::Letter(letter) = *key else {
                    continue;
                };
                if !letter.is_ascii_alphabetic()
                    || !is_key_just_pressed_or_repeating(input.key_press_duration(*key), tps)
                {
                    continue;
                }
                let ctrl = Key::Ctrl(letter.to_ascii_lowercase());
                state.post(queue, Event::key(ctrl, mods - ModMask::CTRL));
                posted = true;
            }
        } else {
            for &ch in input.input_chars() {
                state.post(queue, Event::key(Key::Rune(ch), mods - ModMask::SHIFT));
                posted = true;
            }
        }

        for key in pressed {
            let Some(mapped) = special_key(key) else {
                continue;
            };
            if is_key_just_pressed_or_repeating(input.key_press_duration(key), tps) {
                state.post(queue, Event::key(mapped, mods));
                posted = true;
            }
        }

        in_focus = true;
    }

    if !in_focus && state.focused {
        state.post(queue, Event::Focus { focused: false });
        state.focused = false;
        posted = true;
    }

    if !posted {
        state.post(queue, Event::time());
    }
}
