//! Frame-Loop Hosts
//!
//! A host owns the frame loop: it negotiates the image size, feeds input to
//! [`FrameGame::update`] once per tick, draws, and presents the result.
//! [`HeadlessHost`] replays scripted input with no window; `WinitHost`
//! (feature `gui`) runs in a desktop window.

mod headless;
#[cfg(feature = "gui")]
mod window;

pub use headless::HeadlessHost;
#[cfg(feature = "gui")]
pub use window::WinitHost;

use crate::error::Error;
use crate::game::FrameGame;

/// Something that can drive a [`FrameGame`] until it stops
pub trait FrameHost {
    /// Run `game` until its `update` returns an error. A host returns
    /// [`Error::Termination`] as `Ok(())`.
    fn run_game<G: FrameGame + 'static>(self, game: G) -> Result<(), Error>;
}
