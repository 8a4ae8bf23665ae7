//! Terminal Lifecycle
//!
//! [`Terminal`] owns the state shared by the application side ([`Screen`])
//! and the frame-loop side ([`Game`]). It configures font, grid size,
//! cursor color and input capture, and [`Terminal::run`] wires an
//! application runner to a frame host.

use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::core::{Color, MouseFlags};
use crate::error::Error;
use crate::font::{Face, MonoFont, DEFAULT_FONT_SIZE};
use crate::game::Game;
use crate::geom::Rect;
use crate::host::FrameHost;
use crate::screen::{
    BeepHandler, Screen, Shared, DEFAULT_BLINK_CURSOR_MS, DEFAULT_BLINK_TEXT_MS,
};

/// Name of the thread running the application side
const RUNNER_THREAD_NAME: &str = "cellframe-app";

/// A terminal hosted in a frame loop
///
/// Cloning yields another handle to the same terminal. Configuration
/// methods return `&Self` so they can be chained.
#[derive(Clone)]
pub struct Terminal {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Terminal")
            .field("grid", &state.grid.size())
            .field("cell_size", &state.cell_size)
            .field("high_dpi", &state.high_dpi)
            .finish_non_exhaustive()
    }
}

impl Terminal {
    /// Create a terminal with a 1x1 grid. The grid follows the host's
    /// layout once running.
    pub fn new(face: impl Face + 'static) -> Self {
        Self {
            shared: Arc::new(Shared::new(Box::new(face))),
        }
    }

    /// Create a terminal using the first monospace font found on the system
    pub fn with_default_font() -> Result<Self, Error> {
        let face = MonoFont::with_default_font(DEFAULT_FONT_SIZE)?;
        Ok(Self::new(face))
    }

    /// Create a terminal from configuration, loading its font
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let source = config.font_source()?;
        config.validate()?;
        let face = MonoFont::new(source, config.font.size)?;
        let terminal = Self::new(face);
        terminal.apply_config(config);
        Ok(terminal)
    }

    /// Apply everything in `config` except the font
    pub fn apply_config(&self, config: &Config) -> &Self {
        {
            let mut state = self.shared.lock();
            state.cursor.color = config.cursor.color;
            state.cursor.style = config.cursor.style;
            state.mouse_flags = config.reporting.mouse;
            state.enable_focus = config.reporting.focus;
            state.enable_paste = config.reporting.paste;
            state.high_dpi = config.high_dpi;
            state.mouse_capture = config.capture.mouse;
            state.mouse_cells = config.capture.mouse_cells;
            state.key_capture = config.capture.key;
        }
        self.set_blink_durations(config.blink.text_ms, config.blink.cursor_ms)
    }

    /// Replace the glyph face. The grid keeps its dimensions; the pixel
    /// layout follows the new cell size.
    pub fn set_font(&self, face: impl Face + 'static) -> &Self {
        let mut state = self.shared.lock();
        state.set_face(Box::new(face));
        tracing::debug!(cell_size = ?state.cell_size, "font changed");
        drop(state);
        self
    }

    /// Resize the grid. Each dimension is at least 1; a change discards
    /// the contents and posts a resize event.
    pub fn set_screen_size(&self, cols: usize, rows: usize) -> &Self {
        self.shared
            .lock()
            .set_screen_size(&self.shared.queue, cols, rows);
        self
    }

    /// Pixel size of the game image: grid size times cell size
    pub fn game_size(&self) -> (usize, usize) {
        let state = self.shared.lock();
        let (cols, rows) = state.grid.size();
        (cols * state.cell_size.0, rows * state.cell_size.1)
    }

    pub fn set_screen_cursor_color(&self, color: Color) -> &Self {
        self.shared.lock().cursor.color = color;
        self
    }

    /// Lay out at device resolution in [`FrameGame::layout_f`]
    ///
    /// [`FrameGame::layout_f`]: crate::game::FrameGame::layout_f
    pub fn set_high_dpi(&self, enable: bool) -> &Self {
        self.shared.lock().high_dpi = enable;
        self
    }

    /// Only report mouse events inside `game_rect` (game image pixels).
    /// A non-empty `cell_rect` maps that area proportionally onto those
    /// cells instead of dividing by the cell size.
    pub fn set_mouse_capture(&self, game_rect: Rect, cell_rect: Rect) -> &Self {
        let mut state = self.shared.lock();
        state.mouse_capture = game_rect;
        state.mouse_cells = cell_rect;
        drop(state);
        self
    }

    /// Only report key events while the pointer is inside `game_rect`
    pub fn set_key_capture(&self, game_rect: Rect) -> &Self {
        self.shared.lock().key_capture = game_rect;
        self
    }

    /// Mouse and key capture over the same area
    pub fn set_input_capture(&self, game_rect: Rect, cell_rect: Rect) -> &Self {
        self.set_mouse_capture(game_rect, cell_rect)
            .set_key_capture(game_rect)
    }

    /// Blink cycle lengths in milliseconds; 0 restores the default
    pub fn set_blink_durations(&self, text_ms: u64, cursor_ms: u64) -> &Self {
        let mut state = self.shared.lock();
        state.blink_text_ms = if text_ms == 0 {
            DEFAULT_BLINK_TEXT_MS
        } else {
            text_ms
        };
        state.blink_cursor_ms = if cursor_ms == 0 {
            DEFAULT_BLINK_CURSOR_MS
        } else {
            cursor_ms
        };
        drop(state);
        self
    }

    /// Callback for [`Screen::beep`]
    pub fn set_beep_handler<F>(&self, handler: F) -> &Self
    where
        F: Fn() -> Result<(), Error> + Send + Sync + 'static,
    {
        let handler: BeepHandler = Arc::new(handler);
        self.shared.lock().beep = Some(handler);
        self
    }

    /// Enable or disable focus event reporting
    pub fn set_focus_reporting(&self, enable: bool) -> &Self {
        self.shared.lock().enable_focus = enable;
        self
    }

    pub fn set_mouse_flags(&self, flags: MouseFlags) -> &Self {
        self.shared.lock().mouse_flags = flags;
        self
    }

    /// Application-side handle
    pub fn screen(&self) -> Screen {
        Screen::from_shared(Arc::clone(&self.shared))
    }

    /// Frame-loop adapter for a host
    pub fn new_game(&self) -> Game {
        Game::new(Arc::clone(&self.shared))
    }

    /// Stop the frame loop on its next tick with `err`, or cleanly with
    /// [`Error::Termination`] when `None`
    pub fn exit(&self, err: Option<Error>) {
        self.shared.exit(err);
    }

    /// Run `runner` on its own thread and the frame loop on this one
    ///
    /// The runner receives the [`Screen`]; when it returns, its result is
    /// handed to [`exit`](Self::exit) so the host stops on the next tick.
    /// Once the host returns the event queue is closed, which ends any
    /// blocked [`Screen::poll_event`]. A clean termination is reported as
    /// `Ok(())`.
    pub fn run<R, H>(&self, runner: R, host: H) -> Result<(), Error>
    where
        R: FnOnce(Screen) -> Result<(), Error> + Send + 'static,
        H: FrameHost,
    {
        let screen = self.screen();
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name(RUNNER_THREAD_NAME.to_string())
            .spawn(move || {
                let result = runner(screen);
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "application exited with error");
                }
                shared.exit(result.err());
            })
            .map_err(|e| Error::Host(format!("failed to spawn {}: {}", RUNNER_THREAD_NAME, e)))?;

        tracing::info!("frame loop starting");
        let result = host.run_game(self.new_game());
        tracing::info!("frame loop stopped");
        self.shared.queue.close();

        match result {
            Err(err) if err.is_termination() => Ok(()),
            other => other,
        }
    }
}
