//! Rendering
//!
//! Two passes over the grid:
//! - [`show`] resolves each changed cell's colors and glyphs under the
//!   screen lock and marks it synced
//! - [`draw`] blits synced cells and the cursor into the output image,
//!   working on a snapshot taken outside the lock

mod draw;

pub use draw::blink_phase;
pub(crate) use draw::{draw, DrawParams};

use crate::core::{AttrMask, Color, Style};
use crate::font::FontStyle;
use crate::geom::Point;
use crate::image::Rgba;
use crate::screen::ScreenState;

fn to_rgba(color: Color, default: Rgba) -> Rgba {
    match color.rgb() {
        Some((r, g, b)) => Rgba::opaque(r, g, b),
        None => default,
    }
}

/// Resolve a style into drawn foreground and background colors and the
/// attributes that still apply
pub(crate) fn resolve_style(style: Style, style_default: Style) -> (Rgba, Rgba, AttrMask) {
    let style = if style == Style::DEFAULT {
        style_default
    } else {
        style
    };
    let (fg, bg, mut attrs) = style.decompose();
    if attrs.contains(AttrMask::INVALID) {
        attrs = AttrMask::empty();
    }

    let mut fg = to_rgba(fg, Rgba::WHITE);
    let mut bg = to_rgba(bg, Rgba::BLACK);

    if attrs.contains(AttrMask::REVERSE) {
        std::mem::swap(&mut fg, &mut bg);
    }
    if attrs.contains(AttrMask::BOLD) {
        let intensify = |c: u8| c.saturating_mul(2);
        fg = Rgba::opaque(intensify(fg.r), intensify(fg.g), intensify(fg.b));
    }
    if attrs.contains(AttrMask::DIM) {
        fg = Rgba::opaque(fg.r / 2, fg.g / 2, fg.b / 2);
    }
    (fg, bg, attrs)
}

/// Resolve every cell that changed since the last pass
pub(crate) fn show(state: &mut ScreenState) {
    let ScreenState {
        face,
        grid,
        rune_fallback,
        style_default,
        cell_size,
        ..
    } = state;
    let cols = grid.cols();
    let (cw, ch) = *cell_size;

    for (n, cell) in grid.cells_mut().iter_mut().enumerate() {
        if cell.synced {
            continue;
        }

        let (fg, bg, attrs) = resolve_style(cell.style, *style_default);
        cell.fg = fg;
        cell.bg = bg;
        cell.attrs = attrs;
        cell.point = Point::new(((n % cols) * cw) as i32, ((n / cols) * ch) as i32);

        let mut runes: Vec<char> = std::iter::once(cell.ch)
            .chain(cell.combining.iter().copied())
            .collect();
        let (_, missing) = face.glyph(cell.ch, FontStyle::Normal);
        if missing {
            runes = match rune_fallback.get(&cell.ch) {
                Some(subst) if !subst.is_empty() => subst.chars().collect(),
                _ => vec![' '],
            };
        }

        let font_style = FontStyle::from_attrs(attrs);
        let (glyph, _) = face.glyph(runes[0], font_style);
        cell.glyph = Some(glyph);
        cell.combining_glyphs = runes[1..]
            .iter()
            .map(|&r| face.glyph(r, font_style).0)
            .collect();
        cell.synced = true;
    }
}

/// Mark every cell changed, then [`show`]
pub(crate) fn sync(state: &mut ScreenState) {
    state.grid.invalidate();
    show(state);
}
