//! Frame-Loop Adapter
//!
//! [`FrameGame`] is the contract a frame-loop host drives: `update` once per
//! tick, `draw` into the output image, and `layout` to negotiate the image
//! size. [`Game`] implements it over the shared screen state.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::Cell;
use crate::error::Error;
use crate::geom::GeoM;
use crate::image::Image;
use crate::input::{self, InputState};
use crate::render::{self, DrawParams};
use crate::screen::Shared;

/// A game driven by a frame-loop host
pub trait FrameGame {
    /// Process one tick of input. An error stops the host loop;
    /// [`Error::Termination`] stops it cleanly.
    fn update(&mut self, input: &dyn InputState) -> Result<(), Error>;

    fn draw(&mut self, screen: &mut Image);

    /// Given the outside size in pixels, return the image size to draw
    fn layout(&mut self, outside_width: usize, outside_height: usize) -> (usize, usize);

    /// High-DPI layout: sizes are in logical pixels, `scale` is the device
    /// pixel ratio
    fn layout_f(&mut self, outside_width: f64, outside_height: f64, scale: f64) -> (f64, f64) {
        let (w, h) = self.layout(
            (outside_width * scale) as usize,
            (outside_height * scale) as usize,
        );
        (w as f64, h as f64)
    }
}

/// The terminal screen as a [`FrameGame`]
pub struct Game {
    shared: Arc<Shared>,
    /// Transform from grid pixels to output pixels, also used in reverse
    /// to map the pointer
    pub geom: GeoM,
    /// Snapshot of the grid being drawn
    grid_draw: Vec<Cell>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("geom", &self.geom)
            .finish_non_exhaustive()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}

impl Game {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            geom: GeoM::IDENTITY,
            grid_draw: Vec::new(),
        }
    }

    /// Draw as of `now_ms` milliseconds since the epoch
    pub fn draw_at(&mut self, screen: &mut Image, now_ms: u64) {
        let params = {
            let state = self.shared.lock();
            self.grid_draw.clear();
            self.grid_draw.extend_from_slice(state.grid.cells());
            DrawParams {
                cell_image: Arc::clone(&state.cell_image),
                cell_size: state.cell_size,
                grid_size: state.grid.size(),
                cursor: state.cursor,
                blink_text_ms: state.blink_text_ms,
                blink_cursor_ms: state.blink_cursor_ms,
                geom: self.geom,
            }
        };
        render::draw(screen, &self.grid_draw, &params, now_ms);
    }
}

impl FrameGame for Game {
    /// Returns the pending exit error, if any; otherwise translates input
    /// unless the screen is suspended
    fn update(&mut self, input: &dyn InputState) -> Result<(), Error> {
        let mut state = self.shared.lock();
        if let Some(err) = state.close_error.take() {
            return Err(err);
        }
        if state.suspended {
            return Ok(());
        }
        input::update(&mut state, &self.shared.queue, &self.geom, input);
        Ok(())
    }

    fn draw(&mut self, screen: &mut Image) {
        self.draw_at(screen, now_ms());
    }

    /// Fit as many whole cells as the outside size allows
    fn layout(&mut self, outside_width: usize, outside_height: usize) -> (usize, usize) {
        let mut state = self.shared.lock();
        let (cw, ch) = state.cell_size;
        state.set_screen_size(&self.shared.queue, outside_width / cw, outside_height / ch);
        let layout = state.layout;
        (layout.width() as usize, layout.height() as usize)
    }

    /// Applies `scale` only in high-DPI mode
    fn layout_f(&mut self, outside_width: f64, outside_height: f64, scale: f64) -> (f64, f64) {
        let high_dpi = self.shared.lock().high_dpi;
        let scale = if high_dpi && scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        let (w, h) = self.layout(
            (outside_width * scale) as usize,
            (outside_height * scale) as usize,
        );
        (w as f64, h as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, Style};
    use crate::font::block_face;
    use crate::image::Rgba;
    use crate::input::InputSnapshot;

    fn game() -> Game {
        let shared = Arc::new(Shared::new(Box::new(block_face(2, 3, "a"))));
        shared.queue.open();
        Game::new(shared)
    }

    #[test]
    fn test_layout_floors_to_whole_cells() {
        let mut game = game();
        assert_eq!(game.layout(20, 30), (20, 30));
        assert_eq!(game.shared.lock().grid.size(), (10, 10));
        assert_eq!(game.layout(21, 31), (20, 30));
        assert_eq!(game.layout(1, 1), (2, 3));
    }

    #[test]
    fn test_layout_posts_one_resize() {
        let mut game = game();
        game.layout(20, 30);
        game.layout(21, 31);
        game.layout(40, 30);
        let events: Vec<Event> = std::iter::from_fn(|| game.shared.queue.try_pop()).collect();
        assert_eq!(
            events,
            vec![
                Event::Resize { cols: 10, rows: 10 },
                Event::Resize { cols: 20, rows: 10 },
            ]
        );
    }

    #[test]
    fn test_layout_f_respects_high_dpi() {
        let mut game = game();
        assert_eq!(game.layout_f(20.0, 30.0, 2.0), (20.0, 30.0));
        game.shared.lock().high_dpi = true;
        assert_eq!(game.layout_f(20.0, 30.0, 2.0), (40.0, 60.0));
    }

    #[test]
    fn test_update_returns_exit_once() {
        let mut game = game();
        game.shared.exit(None);
        let input = InputSnapshot::new();
        assert!(matches!(game.update(&input), Err(Error::Termination)));
        assert!(game.update(&input).is_ok());
    }

    #[test]
    fn test_suspended_update_posts_nothing() {
        let mut game = game();
        game.shared.lock().suspended = true;
        game.update(&InputSnapshot::new()).unwrap();
        assert!(game.shared.queue.is_empty());
    }

    #[test]
    fn test_draw_uses_shown_cells() {
        let mut game = game();
        game.layout(4, 3);
        {
            let mut state = game.shared.lock();
            state.grid.cell_mut(0, 0).unwrap().set('a', &[], Style::DEFAULT);
            render::show(&mut state);
        }
        let mut image = Image::new(4, 3);
        game.draw_at(&mut image, 600);
        // White glyph for 'a'; the unwritten cell falls back to an empty space
        assert_eq!(image.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(image.pixel(2, 0), Some(Rgba::BLACK));
    }
}
