//! Window host
//!
//! Runs a game in a winit window, presenting through softbuffer. Ticks run
//! at a fixed rate; each tick negotiates the layout, updates with the input
//! gathered since the last tick and draws. The game image is scaled
//! uniformly to fit the window and centered (letterboxed).

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use softbuffer::{Context, Surface};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use super::FrameHost;
use crate::error::Error;
use crate::game::FrameGame;
use crate::image::Image;
use crate::input::{HostButton, HostKey, InputSnapshot};

/// Default ticks per second
pub const DEFAULT_TPS: u32 = 60;

/// Pixels of smooth scrolling per wheel line
const PIXELS_PER_LINE: f64 = 20.0;

const LETTER_CODES: [(KeyCode, char); 26] = [
    (KeyCode::KeyA, 'A'),
    (KeyCode::KeyB, 'B'),
    (KeyCode::KeyC, 'C'),
    (KeyCode::KeyD, 'D'),
    (KeyCode::KeyE, 'E'),
    (KeyCode::KeyF, 'F'),
    (KeyCode::KeyG, 'G'),
    (KeyCode::KeyH, 'H'),
    (KeyCode::KeyI, 'I'),
    (KeyCode::KeyJ, 'J'),
    (KeyCode::KeyK, 'K'),
    (KeyCode::KeyL, 'L'),
    (KeyCode::KeyM, 'M'),
    (KeyCode::KeyN, 'N'),
    (KeyCode::KeyO, 'O'),
    (KeyCode::KeyP, 'P'),
    (KeyCode::KeyQ, 'Q'),
    (KeyCode::KeyR, 'R'),
    (KeyCode::KeyS, 'S'),
    (KeyCode::KeyT, 'T'),
    (KeyCode::KeyU, 'U'),
    (KeyCode::KeyV, 'V'),
    (KeyCode::KeyW, 'W'),
    (KeyCode::KeyX, 'X'),
    (KeyCode::KeyY, 'Y'),
    (KeyCode::KeyZ, 'Z'),
];

const FUNCTION_CODES: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

fn host_key(code: KeyCode) -> Option<HostKey> {
    if let Some((_, letter)) = LETTER_CODES.iter().find(|(c, _)| *c == code) {
        return Some(HostKey::Letter(*letter));
    }
    if let Some(n) = FUNCTION_CODES.iter().position(|c| *c == code) {
        return Some(HostKey::F(n as u8 + 1));
    }
    let key = match code {
        KeyCode::ArrowUp => HostKey::ArrowUp,
        KeyCode::ArrowDown => HostKey::ArrowDown,
        KeyCode::ArrowLeft => HostKey::ArrowLeft,
        KeyCode::ArrowRight => HostKey::ArrowRight,
        KeyCode::Backspace => HostKey::Backspace,
        KeyCode::Delete => HostKey::Delete,
        KeyCode::End => HostKey::End,
        KeyCode::Enter | KeyCode::NumpadEnter => HostKey::Enter,
        KeyCode::Escape => HostKey::Escape,
        KeyCode::Home => HostKey::Home,
        KeyCode::Insert => HostKey::Insert,
        KeyCode::PageDown => HostKey::PageDown,
        KeyCode::PageUp => HostKey::PageUp,
        KeyCode::Tab => HostKey::Tab,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => HostKey::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => HostKey::Control,
        KeyCode::AltLeft | KeyCode::AltRight => HostKey::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => HostKey::Meta,
        _ => return None,
    };
    Some(key)
}

fn host_button(button: MouseButton) -> Option<HostButton> {
    match button {
        MouseButton::Left => Some(HostButton::Left),
        MouseButton::Middle => Some(HostButton::Middle),
        MouseButton::Right => Some(HostButton::Right),
        _ => None,
    }
}

fn host_err(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Host(format!("{}: {}", context, err))
}

/// Placement of the game image inside the window
#[derive(Debug, Clone, Copy, PartialEq)]
struct Letterbox {
    scale: f64,
    offset: (f64, f64),
    image: (usize, usize),
}

impl Default for Letterbox {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: (0.0, 0.0),
            image: (0, 0),
        }
    }
}

impl Letterbox {
    fn fit(window: (u32, u32), image: (usize, usize)) -> Self {
        if image.0 == 0 || image.1 == 0 || window.0 == 0 || window.1 == 0 {
            return Self {
                image,
                ..Self::default()
            };
        }
        let (ww, wh) = (window.0 as f64, window.1 as f64);
        let (iw, ih) = (image.0 as f64, image.1 as f64);
        let scale = (ww / iw).min(wh / ih);
        Self {
            scale,
            offset: ((ww - iw * scale) / 2.0, (wh - ih * scale) / 2.0),
            image,
        }
    }

    /// Window pixel to game image pixel
    fn to_image(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset.0) / self.scale,
            (y - self.offset.1) / self.scale,
        )
    }

    /// Nearest-sample `image` into a `width` x `height` XRGB buffer
    fn blit(&self, image: &Image, buffer: &mut [u32], width: usize, height: usize) {
        buffer.fill(0);
        if image.size() != self.image || image.width() == 0 || image.height() == 0 {
            return;
        }
        for py in 0..height {
            let v = (py as f64 + 0.5 - self.offset.1) / self.scale;
            if v < 0.0 || v >= image.height() as f64 {
                continue;
            }
            let row = &mut buffer[py * width..(py + 1) * width];
            for (px, out) in row.iter_mut().enumerate() {
                let u = (px as f64 + 0.5 - self.offset.0) / self.scale;
                if u < 0.0 || u >= image.width() as f64 {
                    continue;
                }
                if let Some(pixel) = image.pixel(u as usize, v as usize) {
                    *out = pixel.to_xrgb();
                }
            }
        }
    }
}

/// Input gathered from window events between ticks
#[derive(Debug)]
struct WindowInput {
    /// Pointer in window pixels
    cursor: (f64, f64),
    buttons: Vec<HostButton>,
    wheel: (f64, f64),
    /// Held keys and the ticks they have been held
    held: BTreeMap<HostKey, u32>,
    /// Keys released since the last tick, still reported for one tick
    released: BTreeSet<HostKey>,
    chars: Vec<char>,
    tps: f64,
}

impl WindowInput {
    fn new(tps: f64) -> Self {
        Self {
            cursor: (-1.0, -1.0),
            buttons: Vec::new(),
            wheel: (0.0, 0.0),
            held: BTreeMap::new(),
            released: BTreeSet::new(),
            chars: Vec::new(),
            tps,
        }
    }

    fn key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let key = host_key(code);
        match event.state {
            ElementState::Pressed => {
                if let Some(key) = key {
                    self.held.entry(key).or_insert(0);
                    self.released.remove(&key);
                }
                if let Some(text) = &event.text {
                    self.chars.extend(text.chars().filter(|c| !c.is_control()));
                }
            }
            ElementState::Released => {
                if let Some(key) = key {
                    if self.held.contains_key(&key) {
                        self.released.insert(key);
                    }
                }
            }
        }
    }

    fn modifiers(&mut self, state: ModifiersState) {
        let mods = [
            (HostKey::Shift, state.shift_key()),
            (HostKey::Control, state.control_key()),
            (HostKey::Alt, state.alt_key()),
            (HostKey::Meta, state.super_key()),
        ];
        for (key, down) in mods {
            if !down && self.held.contains_key(&key) {
                self.released.insert(key);
            }
        }
    }

    fn button(&mut self, button: MouseButton, state: ElementState) {
        let Some(button) = host_button(button) else {
            return;
        };
        self.buttons.retain(|b| *b != button);
        if state == ElementState::Pressed {
            self.buttons.push(button);
        }
    }

    fn scroll(&mut self, delta: MouseScrollDelta) {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
            MouseScrollDelta::PixelDelta(pos) => (pos.x / PIXELS_PER_LINE, pos.y / PIXELS_PER_LINE),
        };
        self.wheel.0 += x;
        self.wheel.1 += y;
    }

    fn release_all(&mut self) {
        self.released.extend(self.held.keys().copied());
        self.buttons.clear();
    }

    /// Smoothed ticks per second from the latest tick interval
    fn measure(&mut self, interval: Duration) {
        let secs = interval.as_secs_f64();
        if secs > 0.0 {
            self.tps = self.tps * 0.9 + (1.0 / secs) * 0.1;
        }
    }

    /// Advance held keys by one tick and capture this tick's input
    fn begin_tick(&mut self, view: &Letterbox) -> InputSnapshot {
        for duration in self.held.values_mut() {
            *duration = duration.saturating_add(1);
        }
        let (x, y) = view.to_image(self.cursor.0, self.cursor.1);
        InputSnapshot {
            cursor: (x, y),
            buttons: self.buttons.clone(),
            wheel: self.wheel,
            keys: self.held.iter().map(|(k, d)| (*k, *d)).collect(),
            chars: self.chars.clone(),
            tps: self.tps,
        }
    }

    fn end_tick(&mut self) {
        for key in std::mem::take(&mut self.released) {
            self.held.remove(&key);
        }
        self.chars.clear();
        self.wheel = (0.0, 0.0);
    }
}

/// A frame host that opens a desktop window
#[derive(Debug, Clone)]
pub struct WinitHost {
    title: String,
    /// Initial inner size in logical pixels
    width: u32,
    height: u32,
    tps: u32,
}

impl WinitHost {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            tps: DEFAULT_TPS,
        }
    }

    /// Ticks per second; 0 is treated as 1
    pub fn with_tps(mut self, tps: u32) -> Self {
        self.tps = tps.max(1);
        self
    }
}

type WindowSurface = Surface<Rc<Window>, Rc<Window>>;

fn present(
    surface: &mut WindowSurface,
    window: &Window,
    image: &Image,
    view: &Letterbox,
) -> Result<(), Error> {
    let size = window.inner_size();
    let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
        return Ok(());
    };
    surface
        .resize(w, h)
        .map_err(|e| host_err("surface resize", e))?;
    let mut buffer = surface
        .buffer_mut()
        .map_err(|e| host_err("surface buffer", e))?;
    view.blit(image, &mut buffer, size.width as usize, size.height as usize);
    buffer.present().map_err(|e| host_err("present", e))
}

impl FrameHost for WinitHost {
    fn run_game<G: FrameGame + 'static>(self, mut game: G) -> Result<(), Error> {
        let event_loop = EventLoop::new().map_err(|e| host_err("failed to create event loop", e))?;
        let window = Rc::new(
            WindowBuilder::new()
                .with_title(&self.title)
                .with_inner_size(LogicalSize::new(self.width, self.height))
                .build(&event_loop)
                .map_err(|e| host_err("failed to create window", e))?,
        );
        let context =
            Context::new(Rc::clone(&window)).map_err(|e| host_err("softbuffer context", e))?;
        let mut surface = Surface::new(&context, Rc::clone(&window))
            .map_err(|e| host_err("softbuffer surface", e))?;

        let tick = Duration::from_secs_f64(1.0 / self.tps.max(1) as f64);
        let mut input = WindowInput::new(self.tps as f64);
        let mut image = Image::new(0, 0);
        let mut view = Letterbox::default();
        let mut next_tick = Instant::now();
        let mut last_tick: Option<Instant> = None;
        let mut outcome = Ok(());

        tracing::info!(title = %self.title, tps = self.tps, "window host starting");

        event_loop
            .run(|event, elwt| match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        tracing::info!("Window close requested");
                        elwt.exit();
                    }

                    WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                        window.request_redraw();
                    }

                    WindowEvent::KeyboardInput { event, .. } => input.key(&event),

                    WindowEvent::ModifiersChanged(mods) => input.modifiers(mods.state()),

                    WindowEvent::CursorMoved { position, .. } => {
                        input.cursor = (position.x, position.y);
                    }

                    WindowEvent::CursorLeft { .. } => input.cursor = (-1.0, -1.0),

                    WindowEvent::MouseInput { state, button, .. } => input.button(button, state),

                    WindowEvent::MouseWheel { delta, .. } => input.scroll(delta),

                    WindowEvent::Focused(false) => input.release_all(),

                    WindowEvent::RedrawRequested => {
                        if let Err(e) = present(&mut surface, &window, &image, &view) {
                            tracing::error!("Render error: {}", e);
                        }
                    }

                    _ => {}
                },

                Event::AboutToWait => {
                    let now = Instant::now();
                    if now >= next_tick {
                        if let Some(last) = last_tick {
                            input.measure(now - last);
                        }
                        last_tick = Some(now);
                        next_tick = now + tick;

                        let scale = window.scale_factor();
                        let size = window.inner_size();
                        let (w, h) = game.layout_f(
                            size.width as f64 / scale,
                            size.height as f64 / scale,
                            scale,
                        );
                        let image_size = (w as usize, h as usize);
                        if image.size() != image_size {
                            image = Image::new(image_size.0, image_size.1);
                        }
                        view = Letterbox::fit((size.width, size.height), image_size);

                        let snapshot = input.begin_tick(&view);
                        if let Err(err) = game.update(&snapshot) {
                            if !err.is_termination() {
                                outcome = Err(err);
                            }
                            elwt.exit();
                            return;
                        }
                        input.end_tick();

                        image.clear();
                        game.draw(&mut image);
                        window.request_redraw();
                    }
                    elwt.set_control_flow(ControlFlow::WaitUntil(next_tick));
                }

                _ => {}
            })
            .map_err(|e| host_err("event loop error", e))?;

        tracing::info!("window host stopped");
        outcome
    }
}
