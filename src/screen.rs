//! Virtual Screen
//!
//! The terminal-application side of the adapter. [`Screen`] is a cheap,
//! clonable handle over state shared with the frame-loop side ([`Game`]):
//! a cell grid, cursor, default style, reporting toggles and the bounded
//! event queue. Every grid access happens under one mutex; only
//! [`Screen::poll_event`] blocks.
//!
//! [`Game`]: crate::game::Game

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::{
    Color, Cursor, CursorStyle, Event, EventQueue, Grid, Key, MouseFlags, Poll, Style,
};
use crate::error::Error;
use crate::font::{Face, FontStyle};
use crate::geom::Rect;
use crate::image::{Image, Rgba};
use crate::input;
use crate::render;

/// Default text blink cycle
pub const DEFAULT_BLINK_TEXT_MS: u64 = 900;
/// Default cursor blink cycle
pub const DEFAULT_BLINK_CURSOR_MS: u64 = 750;

/// How often a channel forwarder checks its quit signal
const CHANNEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Callback invoked by [`Screen::beep`]
pub type BeepHandler = Arc<dyn Fn() -> Result<(), Error> + Send + Sync>;

/// State guarded by the screen lock
pub(crate) struct ScreenState {
    pub(crate) face: Box<dyn Face>,
    /// Cell size in pixels
    pub(crate) cell_size: (usize, usize),
    /// All-white cell-sized tile used for backgrounds, decorations and cursor
    pub(crate) cell_image: Arc<Image>,
    /// Pixel area covered by the grid
    pub(crate) layout: Rect,
    pub(crate) grid: Grid,
    pub(crate) cursor: Cursor,
    pub(crate) style_default: Style,
    pub(crate) blink_text_ms: u64,
    pub(crate) blink_cursor_ms: u64,

    pub(crate) focused: bool,
    pub(crate) mouse_flags: MouseFlags,
    pub(crate) enable_focus: bool,
    pub(crate) enable_paste: bool,

    pub(crate) rune_fallback: HashMap<char, String>,
    pub(crate) suspended: bool,
    /// Consumed once by the frame loop; `Termination` for a clean exit
    pub(crate) close_error: Option<Error>,
    pub(crate) beep: Option<BeepHandler>,

    /// Pixel area where mouse input is captured; empty means the layout
    pub(crate) mouse_capture: Rect,
    /// Cell area the mouse capture maps onto; empty means plain division
    pub(crate) mouse_cells: Rect,
    /// Pixel area where key input is captured; empty means the layout
    pub(crate) key_capture: Rect,
    pub(crate) high_dpi: bool,
}

impl ScreenState {
    pub(crate) fn new(face: Box<dyn Face>) -> Self {
        let mut state = Self {
            face,
            cell_size: (1, 1),
            cell_image: Arc::new(Image::filled(1, 1, Rgba::WHITE)),
            layout: Rect::EMPTY,
            grid: Grid::new(1, 1),
            cursor: Cursor::default(),
            style_default: Style::DEFAULT,
            blink_text_ms: DEFAULT_BLINK_TEXT_MS,
            blink_cursor_ms: DEFAULT_BLINK_CURSOR_MS,
            focused: false,
            mouse_flags: MouseFlags::BUTTON_EVENTS,
            enable_focus: false,
            enable_paste: false,
            rune_fallback: HashMap::new(),
            suspended: false,
            close_error: None,
            beep: None,
            mouse_capture: Rect::EMPTY,
            mouse_cells: Rect::EMPTY,
            key_capture: Rect::EMPTY,
            high_dpi: false,
        };
        state.apply_face_size();
        state
    }

    /// Install a new face. Cell size changes keep the grid dimensions.
    pub(crate) fn set_face(&mut self, face: Box<dyn Face>) {
        self.face = face;
        self.apply_face_size();
        self.grid.invalidate();
    }

    fn apply_face_size(&mut self) {
        let (w, h) = self.face.size();
        self.cell_size = (w.max(1), h.max(1));
        self.cell_image = Arc::new(Image::filled(self.cell_size.0, self.cell_size.1, Rgba::WHITE));
        let (cols, rows) = self.grid.size();
        self.layout = Rect::from_size(cols * self.cell_size.0, rows * self.cell_size.1);
    }

    /// Resize the grid to `cols` x `rows` (each at least 1)
    ///
    /// A size change reallocates the grid, discarding its contents, and
    /// posts one resize event.
    pub(crate) fn set_screen_size(&mut self, queue: &EventQueue, cols: usize, rows: usize) {
        let cols = cols.max(1);
        let rows = rows.max(1);
        self.layout = Rect::from_size(cols * self.cell_size.0, rows * self.cell_size.1);

        if self.grid.size() != (cols, rows) {
            tracing::debug!(cols, rows, "reallocating cell grid");
            self.grid = Grid::new(cols, rows);
            self.post(queue, Event::Resize { cols, rows });
        }
    }

    /// Post an event if its category is enabled. Drops silently otherwise,
    /// and when the queue is full or closed.
    pub(crate) fn post(&self, queue: &EventQueue, event: Event) -> bool {
        self.accepts(&event) && queue.try_push(event)
    }

    /// Whether the category of `event` is enabled
    pub(crate) fn accepts(&self, event: &Event) -> bool {
        match event {
            Event::Focus { .. } => self.enable_focus,
            Event::Paste { .. } => self.enable_paste,
            Event::Mouse { .. } => !self.mouse_flags.is_empty(),
            _ => true,
        }
    }

    /// Whether the face has a glyph for `ch`, or optionally a fallback
    pub(crate) fn can_display(&mut self, ch: char, check_fallbacks: bool) -> bool {
        let (_, empty) = self.face.glyph(ch, FontStyle::Normal);
        !empty || (check_fallbacks && self.rune_fallback.contains_key(&ch))
    }
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<ScreenState>,
    pub(crate) queue: EventQueue,
}

impl Shared {
    pub(crate) fn new(face: Box<dyn Face>) -> Self {
        Self {
            state: Mutex::new(ScreenState::new(face)),
            queue: EventQueue::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the error the frame loop returns on its next tick
    pub(crate) fn exit(&self, err: Option<Error>) {
        let err = err.unwrap_or(Error::Termination);
        tracing::debug!(error = %err, "exit requested");
        self.lock().close_error = Some(err);
    }
}

/// Handle to the virtual terminal screen
///
/// Cloning yields another handle to the same screen.
#[derive(Clone)]
pub struct Screen {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (cols, rows) = self.size();
        f.debug_struct("Screen")
            .field("cols", &cols)
            .field("rows", &rows)
            .finish_non_exhaustive()
    }
}

impl Screen {
    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    fn lock(&self) -> MutexGuard<'_, ScreenState> {
        self.shared.lock()
    }

    /// Open the event queue and clear the grid
    pub fn init(&self) -> Result<(), Error> {
        tracing::debug!("screen init");
        self.shared.queue.open();
        self.clear();
        Ok(())
    }

    /// Close the event queue. Blocked pollers wake with `None`.
    pub fn fini(&self) {
        tracing::debug!("screen fini");
        self.shared.queue.close();
    }

    /// Ask the frame loop to stop cleanly on its next tick
    pub fn close(&self) {
        self.shared.exit(None);
    }

    /// Shorthand for `fill(' ', Style::DEFAULT)`
    pub fn clear(&self) {
        self.fill(' ', Style::DEFAULT);
    }

    /// Overwrite every cell. Visible after the next [`show`](Self::show).
    pub fn fill(&self, ch: char, style: Style) {
        self.lock().grid.fill(ch, style);
    }

    /// Older form of [`set_content`](Self::set_content); an empty rune list
    /// writes a space
    pub fn set_cell(&self, x: i32, y: i32, style: Style, runes: &[char]) {
        match runes.split_first() {
            Some((&primary, combining)) => self.set_content(x, y, primary, combining, style),
            None => self.set_content(x, y, ' ', &[], style),
        }
    }

    /// Contents of `(x, y)` as `(rune, combining, style, width)`
    ///
    /// Width is always 1 inside the grid. Outside it, every value is zero.
    pub fn get_content(&self, x: i32, y: i32) -> (char, Vec<char>, Style, usize) {
        let state = self.lock();
        match state.grid.cell(x, y) {
            Some(cell) => (cell.ch, cell.combining.clone(), cell.style, 1),
            None => ('\0', Vec::new(), Style::DEFAULT, 0),
        }
    }

    /// Write a cell. Coordinates outside the grid are ignored.
    pub fn set_content(&self, x: i32, y: i32, primary: char, combining: &[char], style: Style) {
        if let Some(cell) = self.lock().grid.cell_mut(x, y) {
            cell.set(primary, combining, style);
        }
    }

    /// Style used for cells carrying [`Style::DEFAULT`]
    pub fn set_style(&self, style: Style) {
        self.lock().style_default = style;
    }

    /// Place the cursor. Positions outside the grid hide it.
    pub fn show_cursor(&self, x: i32, y: i32) {
        self.lock().cursor.show(x, y);
    }

    pub fn hide_cursor(&self) {
        self.lock().cursor.hide();
    }

    /// Set the cursor style and, optionally, its color
    pub fn set_cursor_style(&self, style: CursorStyle, color: Option<Color>) {
        let mut state = self.lock();
        state.cursor.style = style;
        if let Some(color) = color {
            state.cursor.color = color;
        }
    }

    /// Not supported; the host owns the window title
    pub fn set_title(&self, _title: &str) {}

    /// Grid size as `(cols, rows)`
    pub fn size(&self) -> (usize, usize) {
        self.lock().grid.size()
    }

    /// Forward events to `tx` on a background thread
    ///
    /// The forwarder stops, dropping `tx`, once `quit` receives a value or
    /// is disconnected, once the queue is closed, or once `tx`'s receiver
    /// is gone. Do not call [`poll_event`](Self::poll_event) while it runs.
    pub fn channel_events(&self, tx: Sender<Event>, quit: Receiver<()>) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        thread::spawn(move || loop {
            match quit.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Disconnected) => return,
            }
            match shared.queue.pop_timeout(CHANNEL_POLL_INTERVAL) {
                Poll::Event(event) => {
                    if tx.send(event).is_err() {
                        return;
                    }
                }
                Poll::Timeout => {}
                Poll::Closed => return,
            }
        })
    }

    /// Block until an event arrives. `None` once the screen is finalized.
    pub fn poll_event(&self) -> Option<Event> {
        self.shared.queue.pop()
    }

    /// Whether [`poll_event`](Self::poll_event) would return immediately
    pub fn has_pending_event(&self) -> bool {
        !self.shared.queue.is_empty()
    }

    /// Post an event. Disabled categories and a full queue drop it silently.
    pub fn post_event(&self, event: Event) {
        let state = self.lock();
        state.post(&self.shared.queue, event);
    }

    /// Post, blocking while the queue is full
    ///
    /// Calling this from the thread that polls events can deadlock.
    #[deprecated(note = "can deadlock when called from the polling thread; use post_event")]
    pub fn post_event_wait(&self, event: Event) {
        let enabled = self.lock().accepts(&event);
        if enabled {
            self.shared.queue.push_wait(event);
        }
    }

    /// Add mouse reporting flags; an empty set enables all of them
    pub fn enable_mouse(&self, flags: MouseFlags) {
        let flags = if flags.is_empty() {
            MouseFlags::all()
        } else {
            flags
        };
        self.lock().mouse_flags |= flags;
    }

    pub fn disable_mouse(&self) {
        self.lock().mouse_flags = MouseFlags::empty();
    }

    pub fn enable_paste(&self) {
        self.lock().enable_paste = true;
    }

    pub fn disable_paste(&self) {
        self.lock().enable_paste = false;
    }

    pub fn enable_focus(&self) {
        self.lock().enable_focus = true;
    }

    pub fn disable_focus(&self) {
        self.lock().enable_focus = false;
    }

    pub fn has_mouse(&self) -> bool {
        true
    }

    pub fn colors(&self) -> usize {
        16
    }

    /// Resolve every changed cell so the next draw shows it
    pub fn show(&self) {
        render::show(&mut self.lock());
    }

    /// Re-resolve every cell regardless of its synced state
    pub fn sync(&self) {
        render::sync(&mut self.lock());
    }

    pub fn character_set(&self) -> &'static str {
        "UTF-8"
    }

    /// Draw `subst` in place of `ch` when the face has no glyph for it
    pub fn register_rune_fallback(&self, ch: char, subst: &str) {
        self.lock().rune_fallback.insert(ch, subst.to_string());
    }

    pub fn unregister_rune_fallback(&self, ch: char) {
        self.lock().rune_fallback.remove(&ch);
    }

    /// Whether `ch` can be drawn, optionally counting registered fallbacks
    pub fn can_display(&self, ch: char, check_fallbacks: bool) -> bool {
        self.lock().can_display(ch, check_fallbacks)
    }

    /// Not supported; the grid follows the host's layout
    pub fn resize(&self, _x: i32, _y: i32, _width: i32, _height: i32) {}

    /// Whether the host keyboard is believed to produce `key`
    pub fn has_key(&self, key: Key) -> bool {
        match key {
            Key::Rune(_) => true,
            Key::Ctrl(c) => c.is_ascii_lowercase(),
            other => input::host_key_for(other).is_some(),
        }
    }

    /// Stop translating input until [`resume`](Self::resume)
    pub fn suspend(&self) -> Result<(), Error> {
        self.lock().suspended = true;
        Ok(())
    }

    pub fn resume(&self) -> Result<(), Error> {
        self.lock().suspended = false;
        Ok(())
    }

    /// Run the registered beep handler, if any
    pub fn beep(&self) -> Result<(), Error> {
        let handler = self.lock().beep.clone();
        match handler {
            Some(handler) => handler(),
            None => Ok(()),
        }
    }

    /// Not supported; the host owns the window size
    pub fn set_size(&self, _width: i32, _height: i32) {}

    /// Not supported
    pub fn lock_region(&self, _x: i32, _y: i32, _width: i32, _height: i32, _lock: bool) {}

    /// Always `false`: there is no underlying tty
    pub fn is_tty(&self) -> bool {
        false
    }

    /// Not supported
    pub fn get_clipboard(&self) {}

    /// Not supported
    pub fn set_clipboard(&self, _content: &[u8]) {}

    /// Whether the cell at `(x, y)` has been resolved since it last changed
    pub fn is_synced(&self, x: i32, y: i32) -> bool {
        self.lock().grid.cell(x, y).is_some_and(|c| c.is_synced())
    }

    /// Resolved glyph of the cell at `(x, y)`, after [`show`](Self::show)
    pub fn cell_glyph(&self, x: i32, y: i32) -> Option<Arc<Image>> {
        self.lock().grid.cell(x, y).and_then(|c| c.glyph().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttrMask, ModMask};
    use crate::font::CacheFont;
    use std::sync::mpsc;

    fn screen(cols: usize, rows: usize) -> Screen {
        let shared = Arc::new(Shared::new(Box::new(crate::font::block_face(2, 3, "ab "))));
        shared.lock().set_screen_size(&shared.queue, cols, rows);
        let screen = Screen::from_shared(shared);
        screen.init().unwrap();
        screen
    }

    #[test]
    fn test_set_and_get_content() {
        let screen = screen(10, 5);
        let style = Style::DEFAULT.foreground(Color::RED);
        screen.set_content(3, 2, 'a', &['\u{301}'], style);
        assert_eq!(screen.get_content(3, 2), ('a', vec!['\u{301}'], style, 1));
        assert_eq!(screen.get_content(0, 0), (' ', vec![], Style::DEFAULT, 1));
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let screen = screen(10, 5);
        screen.set_content(10, 0, 'a', &[], Style::DEFAULT);
        screen.set_content(-1, 0, 'a', &[], Style::DEFAULT);
        assert_eq!(screen.get_content(10, 0), ('\0', vec![], Style::DEFAULT, 0));
        assert_eq!(screen.get_content(0, 5), ('\0', vec![], Style::DEFAULT, 0));
        // Nothing wrapped into the next row
        assert_eq!(screen.get_content(0, 1).0, ' ');
    }

    #[test]
    fn test_set_cell() {
        let screen = screen(4, 4);
        screen.set_cell(1, 1, Style::DEFAULT, &['x', '\u{300}']);
        assert_eq!(screen.get_content(1, 1).0, 'x');
        assert_eq!(screen.get_content(1, 1).1, vec!['\u{300}']);
        screen.set_cell(2, 1, Style::DEFAULT, &[]);
        assert_eq!(screen.get_content(2, 1).0, ' ');
    }

    #[test]
    fn test_category_filters() {
        let screen = screen(4, 4);
        screen.post_event(Event::Focus { focused: true });
        screen.post_event(Event::Paste { start: true });
        assert!(!screen.has_pending_event());

        screen.enable_focus();
        screen.enable_paste();
        screen.post_event(Event::Focus { focused: true });
        screen.post_event(Event::Paste { start: true });
        assert_eq!(screen.poll_event(), Some(Event::Focus { focused: true }));
        assert_eq!(screen.poll_event(), Some(Event::Paste { start: true }));

        let mouse = Event::Mouse {
            x: 0,
            y: 0,
            buttons: Default::default(),
            mods: ModMask::empty(),
        };
        screen.disable_mouse();
        screen.post_event(mouse.clone());
        assert!(!screen.has_pending_event());
        screen.enable_mouse(MouseFlags::empty());
        screen.post_event(mouse.clone());
        assert_eq!(screen.poll_event(), Some(mouse));
    }

    #[test]
    fn test_both_post_paths_share_the_filter() {
        let screen = screen(4, 4);
        let focus = Event::Focus { focused: false };
        let paste = Event::Paste { start: false };
        {
            let state = screen.lock();
            assert!(!state.accepts(&focus));
            assert!(!state.accepts(&paste));
            assert!(state.accepts(&Event::rune('a')));
        }

        #[allow(deprecated)]
        screen.post_event_wait(focus.clone());
        assert!(!screen.has_pending_event());

        screen.enable_focus();
        assert!(screen.lock().accepts(&focus));
        #[allow(deprecated)]
        screen.post_event_wait(focus.clone());
        screen.post_event(paste);
        assert_eq!(screen.poll_event(), Some(focus));
        assert!(!screen.has_pending_event());
    }

    #[test]
    fn test_fini_ends_polling() {
        let screen = screen(4, 4);
        screen.post_event(Event::rune('a'));
        screen.fini();
        assert_eq!(screen.poll_event(), None);
        // Posting after fini is a no-op
        screen.post_event(Event::rune('b'));
        assert!(!screen.has_pending_event());
    }

    #[test]
    fn test_can_display_with_fallback() {
        let screen = screen(4, 4);
        assert!(screen.can_display('a', false));
        assert!(!screen.can_display('→', false));
        assert!(!screen.can_display('→', true));
        screen.register_rune_fallback('→', ">");
        assert!(!screen.can_display('→', false));
        assert!(screen.can_display('→', true));
        screen.unregister_rune_fallback('→');
        assert!(!screen.can_display('→', true));
    }

    #[test]
    fn test_has_key() {
        let screen = screen(1, 1);
        assert!(screen.has_key(Key::Rune('€')));
        assert!(screen.has_key(Key::Ctrl('c')));
        assert!(screen.has_key(Key::F(12)));
        assert!(screen.has_key(Key::PgDn));
        assert!(!screen.has_key(Key::F(13)));
    }

    #[test]
    fn test_cursor_style_and_color() {
        let screen = screen(4, 4);
        screen.set_cursor_style(CursorStyle::SteadyBar, None);
        assert_eq!(screen.lock().cursor.color, Color::Default);
        screen.set_cursor_style(CursorStyle::BlinkingBlock, Some(Color::LIME));
        let cursor = screen.lock().cursor;
        assert_eq!(cursor.style, CursorStyle::BlinkingBlock);
        assert_eq!(cursor.color, Color::LIME);
    }

    #[test]
    fn test_beep_handler() {
        let screen = screen(1, 1);
        assert!(screen.beep().is_ok());
        let handler: BeepHandler = Arc::new(|| Err(Error::Host("no speaker".into())));
        screen.lock().beep = Some(handler);
        assert!(matches!(screen.beep(), Err(Error::Host(_))));
    }

    #[test]
    fn test_channel_events_forwards_and_quits() {
        let screen = screen(1, 1);
        let (tx, rx) = mpsc::channel();
        let (quit_tx, quit_rx) = mpsc::channel();
        let handle = screen.channel_events(tx, quit_rx);

        screen.post_event(Event::rune('a'));
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)).unwrap(),
            Event::rune('a')
        );
        quit_tx.send(()).unwrap();
        handle.join().unwrap();
        // The sender was dropped
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_stubs_are_inert() {
        let screen = screen(2, 2);
        screen.set_title("ignored");
        screen.resize(0, 0, 10, 10);
        screen.set_size(100, 100);
        screen.lock_region(0, 0, 1, 1, true);
        screen.get_clipboard();
        screen.set_clipboard(b"data");
        assert!(!screen.is_tty());
        assert_eq!(screen.size(), (2, 2));
        assert!(screen.has_mouse());
        assert_eq!(screen.colors(), 16);
        assert_eq!(screen.character_set(), "UTF-8");
    }

    #[test]
    fn test_set_style_is_used_for_default_cells() {
        let screen = screen(2, 1);
        let style = Style::DEFAULT.background(Color::NAVY).attributes(AttrMask::empty());
        screen.set_style(style);
        screen.show();
        let (_, bg) = screen.lock().grid.cells()[0].colors();
        assert_eq!(bg, Rgba::opaque(0, 0, 0x80));
    }

    #[test]
    fn test_face_without_glyphs() {
        let shared = Arc::new(Shared::new(Box::new(CacheFont::new(
            2,
            3,
            Default::default(),
        ))));
        let screen = Screen::from_shared(shared);
        assert!(!screen.can_display('a', false));
    }
}
