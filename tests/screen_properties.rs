//! Screen, font and queue properties

use std::sync::Arc;

use cellframe::core::EVENT_QUEUE_CAPACITY;
use cellframe::font::{CacheFont, FaceMetrics, FaceWithStyle};
use cellframe::{
    Color, CursorStyle, Event, Face, FontStyle, FrameGame, Image, Rgba, Screen, Style, Terminal,
};
use proptest::prelude::*;

/// A face with solid white glyphs for `runes`
fn block_font(width: usize, height: usize, runes: &str) -> CacheFont {
    let mut face = CacheFont::new(width, height, FaceMetrics::default());
    for ch in runes.chars() {
        face.set_glyph(ch, Some(Image::filled(width, height, Rgba::WHITE)))
            .unwrap();
    }
    face
}

fn terminal(cols: usize, rows: usize) -> (Terminal, Screen) {
    let terminal = Terminal::new(block_font(2, 3, "ab "));
    let screen = terminal.screen();
    screen.init().unwrap();
    terminal.set_screen_size(cols, rows);
    while screen.has_pending_event() {
        screen.poll_event();
    }
    (terminal, screen)
}

proptest! {
    #[test]
    fn out_of_bounds_access_is_inert(
        cols in 1usize..12,
        rows in 1usize..12,
        x in -50i32..50,
        y in -50i32..50,
    ) {
        prop_assume!(x < 0 || y < 0 || x >= cols as i32 || y >= rows as i32);
        let (_terminal, screen) = terminal(cols, rows);
        screen.fill('a', Style::DEFAULT);

        screen.set_content(x, y, 'b', &['\u{301}'], Style::DEFAULT.bold(true));
        prop_assert_eq!(screen.get_content(x, y), ('\0', Vec::new(), Style::DEFAULT, 0));

        for cy in 0..rows as i32 {
            for cx in 0..cols as i32 {
                prop_assert_eq!(screen.get_content(cx, cy).0, 'a');
            }
        }
    }

    #[test]
    fn in_bounds_content_round_trips(
        x in 0i32..8,
        y in 0i32..8,
        ch in proptest::char::range('!', '~'),
        fg in 0u8..16,
    ) {
        let (_terminal, screen) = terminal(8, 8);
        let style = Style::DEFAULT.foreground(Color::Indexed(fg));
        screen.set_content(x, y, ch, &[], style);
        prop_assert_eq!(screen.get_content(x, y), (ch, Vec::new(), style, 1));
    }
}

#[test]
fn glyph_lookups_return_the_cached_bitmap() {
    let mut face = block_font(2, 3, "a");
    let (first, empty) = face.glyph('a', FontStyle::Normal);
    assert!(!empty);
    let (second, _) = face.glyph('a', FontStyle::Normal);
    assert!(Arc::ptr_eq(&first, &second));

    let (missing, empty) = face.glyph('z', FontStyle::Normal);
    assert!(empty);
    let (again, empty) = face.glyph('z', FontStyle::Normal);
    assert!(empty);
    assert!(Arc::ptr_eq(&missing, &again));
    assert!(Arc::ptr_eq(&missing, &face.empty()));
}

#[test]
fn fill_then_show_syncs_every_cell_to_space() {
    let font = block_font(2, 3, " ");
    let mut probe = font.clone();
    let (space, _) = probe.glyph(' ', FontStyle::Normal);

    let terminal = Terminal::new(font);
    terminal.set_screen_size(5, 4);
    let screen = terminal.screen();
    screen.fill(' ', Style::DEFAULT);
    assert!(!screen.is_synced(0, 0));
    screen.show();

    for y in 0..4 {
        for x in 0..5 {
            assert!(screen.is_synced(x, y));
            let glyph = screen.cell_glyph(x, y).unwrap();
            assert!(Arc::ptr_eq(&glyph, &space));
        }
    }
}

#[test]
fn hidden_cursor_draws_nothing() {
    let (terminal, screen) = terminal(4, 2);
    screen.fill('a', Style::DEFAULT.foreground(Color::RED));
    screen.show();
    let mut game = terminal.new_game();

    let mut baseline = Image::new(8, 6);
    game.draw_at(&mut baseline, 0);

    let styles = [
        CursorStyle::Default,
        CursorStyle::BlinkingBlock,
        CursorStyle::SteadyBlock,
        CursorStyle::BlinkingUnderline,
        CursorStyle::SteadyUnderline,
        CursorStyle::BlinkingBar,
        CursorStyle::SteadyBar,
    ];
    for style in styles {
        screen.set_cursor_style(style, Some(Color::WHITE));
        screen.show_cursor(-1, -1);
        for now in [0, 100, 400, 700] {
            let mut image = Image::new(8, 6);
            game.draw_at(&mut image, now);
            assert_eq!(image, baseline, "{:?} at {}ms", style, now);
        }
    }

    screen.show_cursor(0, 0);
    screen.set_cursor_style(CursorStyle::SteadyBlock, None);
    let mut image = Image::new(8, 6);
    game.draw_at(&mut image, 0);
    assert_ne!(image, baseline);
}

#[test]
fn resize_discards_content_and_posts_one_event() {
    let (terminal, screen) = terminal(4, 3);
    screen.set_content(1, 1, 'a', &[], Style::DEFAULT);

    terminal.set_screen_size(6, 3);
    terminal.set_screen_size(6, 3);
    assert_eq!(screen.get_content(1, 1).0, '\0');
    assert_eq!(screen.poll_event(), Some(Event::Resize { cols: 6, rows: 3 }));
    assert!(!screen.has_pending_event());
}

#[test]
fn style_selector_falls_back() {
    let faces = FaceWithStyle::new(block_font(2, 3, "a"))
        .with_style(FontStyle::Bold, block_font(2, 3, "a"));
    assert_eq!(faces.resolve(FontStyle::Italic), FontStyle::Normal);
    assert_eq!(faces.resolve(FontStyle::BoldItalic), FontStyle::Bold);
    assert_eq!(faces.resolve(FontStyle::Bold), FontStyle::Bold);
}

#[test]
fn layout_floors_to_whole_cells() {
    let (terminal, screen) = terminal(10, 20);
    let mut game = terminal.new_game();
    assert_eq!(game.layout(20, 30), (20, 30));
    assert_eq!(screen.size(), (10, 10));
    assert_eq!(game.layout(21, 31), (20, 30));
    assert_eq!(terminal.game_size(), (20, 30));
}

#[test]
fn can_display_with_fallback() {
    let (_terminal, screen) = terminal(2, 2);
    assert!(screen.can_display('a', false));
    assert!(!screen.can_display('\u{2192}', false));
    assert!(!screen.can_display('\u{2192}', true));

    screen.register_rune_fallback('\u{2192}', "->");
    assert!(!screen.can_display('\u{2192}', false));
    assert!(screen.can_display('\u{2192}', true));

    screen.unregister_rune_fallback('\u{2192}');
    assert!(!screen.can_display('\u{2192}', true));
}

#[test]
fn full_queue_drops_extra_events() {
    let (_terminal, screen) = terminal(2, 2);
    let posted: Vec<Event> = (0..=EVENT_QUEUE_CAPACITY as u32)
        .map(|i| Event::rune(char::from_u32(0x100 + i).unwrap()))
        .collect();
    for event in &posted {
        screen.post_event(event.clone());
    }

    let mut delivered = Vec::new();
    while screen.has_pending_event() {
        delivered.push(screen.poll_event().unwrap());
    }
    assert_eq!(delivered, posted[..EVENT_QUEUE_CAPACITY]);
}
