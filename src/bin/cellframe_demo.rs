//! Cellframe Demo
//!
//! A small text UI in a window: styled text, a rune fallback, the cursor,
//! and a log of key and mouse events. Esc or Ctrl+C quits.
//!
//! # Usage
//!
//! ```bash
//! cellframe-demo [config.json]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use cellframe::host::WinitHost;
use cellframe::{
    AttrMask, Color, Config, CursorStyle, Error, Event, Key, MouseFlags, Screen, Style, Terminal,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TITLE: &str = "Cellframe Demo";
const LOG_LINES: usize = 8;

fn put_str(screen: &Screen, x: i32, y: i32, style: Style, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        screen.set_content(x + i as i32, y, ch, &[], style);
    }
}

fn draw(screen: &Screen, log: &[String]) {
    screen.clear();
    let (cols, rows) = screen.size();

    let title = Style::DEFAULT
        .foreground(Color::BLACK)
        .background(Color::AQUA)
        .bold(true);
    let header = format!(" {:<width$}", TITLE, width = cols.saturating_sub(1));
    put_str(screen, 0, 0, title, &header);

    let samples = [
        ("bold", Style::DEFAULT.bold(true)),
        ("dim", Style::DEFAULT.dim(true)),
        ("italic", Style::DEFAULT.italic(true)),
        ("underline", Style::DEFAULT.underline(true)),
        ("strike", Style::DEFAULT.strike_through(true)),
        ("reverse", Style::DEFAULT.reverse(true)),
        ("blink", Style::DEFAULT.blink(true)),
    ];
    let mut x = 1;
    for (name, style) in samples {
        put_str(screen, x, 2, style, name);
        x += name.len() as i32 + 1;
    }

    for i in 0..16u8 {
        let style = Style::DEFAULT.background(Color::Indexed(i));
        put_str(screen, 1 + 2 * i as i32, 4, style, "  ");
    }

    // Rendered through the fallback table when the font lacks it
    let fallback = "fallback: \u{2192} ";
    put_str(screen, 1, 6, Style::DEFAULT, fallback);

    let base = rows as i32 - LOG_LINES as i32 - 1;
    put_str(
        screen,
        1,
        base.max(8),
        Style::DEFAULT.attributes(AttrMask::UNDERLINE),
        "events",
    );
    for (i, line) in log.iter().enumerate() {
        put_str(screen, 1, base.max(8) + 1 + i as i32, Style::DEFAULT, line);
    }

    screen.show_cursor(1 + fallback.chars().count() as i32, 6);
    screen.show();
}

fn app(screen: Screen) -> Result<(), Error> {
    screen.init()?;
    screen.enable_mouse(MouseFlags::all());
    screen.enable_focus();
    screen.set_cursor_style(CursorStyle::BlinkingBlock, Some(Color::YELLOW));
    screen.register_rune_fallback('\u{2192}', "->");

    let mut log: Vec<String> = Vec::new();
    draw(&screen, &log);

    while let Some(event) = screen.poll_event() {
        match &event {
            Event::Key {
                key: Key::Escape | Key::Ctrl('c'),
                ..
            } => return Ok(()),
            Event::Time { .. } => continue,
            _ => {}
        }
        tracing::debug!(?event, "event");
        log.push(format!("{:?}", event));
        if log.len() > LOG_LINES {
            log.remove(0);
        }
        draw(&screen, &log);
    }
    Ok(())
}

fn load_config() -> Result<Config, Error> {
    match std::env::args().nth(1) {
        Some(path) => Ok(Config::load(&PathBuf::from(path))?),
        None => Ok(Config::default()),
    }
}

fn run() -> Result<(), Error> {
    let config = load_config()?;
    let terminal = Terminal::from_config(&config)?;
    terminal.run(app, WinitHost::new(TITLE, 800, 480))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Cellframe demo starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
