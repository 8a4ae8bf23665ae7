//! Headless host
//!
//! Drives a game at a fixed outside size with scripted input, one
//! [`InputSnapshot`] per tick. Once the script runs out, the idle snapshot
//! repeats until the game stops or the frame limit is reached.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use super::FrameHost;
use crate::error::Error;
use crate::game::FrameGame;
use crate::image::Image;
use crate::input::InputSnapshot;

/// Default frame limit
pub const DEFAULT_MAX_FRAMES: usize = 10_000;

/// Default pause between ticks
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(1);

type FrameObserver = Box<dyn FnMut(usize, &Image)>;

/// A frame host without a window
pub struct HeadlessHost {
    width: f64,
    height: f64,
    scale: f64,
    frames: VecDeque<InputSnapshot>,
    idle: InputSnapshot,
    max_frames: usize,
    frame_delay: Duration,
    observer: Option<FrameObserver>,
}

impl std::fmt::Debug for HeadlessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessHost")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("frames", &self.frames.len())
            .field("max_frames", &self.max_frames)
            .finish_non_exhaustive()
    }
}

impl HeadlessHost {
    /// A host offering `width` x `height` logical pixels
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            scale: 1.0,
            frames: VecDeque::new(),
            idle: InputSnapshot::new(),
            max_frames: DEFAULT_MAX_FRAMES,
            frame_delay: DEFAULT_FRAME_DELAY,
            observer: None,
        }
    }

    /// Device pixel ratio passed to [`FrameGame::layout_f`]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Append scripted ticks
    pub fn with_frames(mut self, frames: impl IntoIterator<Item = InputSnapshot>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// Input used once the script is exhausted
    pub fn with_idle(mut self, idle: InputSnapshot) -> Self {
        self.idle = idle;
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Called after every draw with the tick number and the drawn image
    pub fn with_observer(mut self, observer: impl FnMut(usize, &Image) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }
}

impl FrameHost for HeadlessHost {
    fn run_game<G: FrameGame + 'static>(mut self, mut game: G) -> Result<(), Error> {
        tracing::debug!(width = self.width, height = self.height, "headless host starting");
        let mut image = Image::new(0, 0);

        for frame in 0..self.max_frames {
            let (w, h) = game.layout_f(self.width, self.height, self.scale);
            let size = (w as usize, h as usize);
            if image.size() != size {
                image = Image::new(size.0, size.1);
            }

            let input = self.frames.pop_front().unwrap_or_else(|| self.idle.clone());
            match game.update(&input) {
                Ok(()) => {}
                Err(err) if err.is_termination() => {
                    tracing::debug!(frame, "headless host stopped");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }

            image.clear();
            game.draw(&mut image);
            if let Some(observer) = self.observer.as_mut() {
                observer(frame, &image);
            }

            if !self.frame_delay.is_zero() {
                thread::sleep(self.frame_delay);
            }
        }

        Err(Error::Host(format!(
            "frame limit of {} reached",
            self.max_frames
        )))
    }
}
