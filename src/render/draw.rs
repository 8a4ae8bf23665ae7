//! Draw pass
//!
//! Blits a snapshot of the grid into the output image: per cell a
//! background tile, the glyphs, then underline and strike-through bands;
//! finally the cursor overlay.

use std::sync::Arc;

use crate::core::{AttrMask, Cell, Cursor, CursorShape};
use crate::geom::GeoM;
use crate::image::{Blend, DrawOptions, Image, Rgba};

/// Everything the draw pass needs besides the cells
#[derive(Debug, Clone)]
pub(crate) struct DrawParams {
    pub cell_image: Arc<Image>,
    pub cell_size: (usize, usize),
    pub grid_size: (usize, usize),
    pub cursor: Cursor,
    pub blink_text_ms: u64,
    pub blink_cursor_ms: u64,
    pub geom: GeoM,
}

/// Whether `now_ms` falls in the "blink" half of a `cycle_ms` cycle, during
/// which blinking content is hidden
pub fn blink_phase(now_ms: u64, cycle_ms: u64) -> bool {
    if cycle_ms == 0 {
        return false;
    }
    now_ms % cycle_ms < cycle_ms / 2
}

fn options(color: Rgba, x: f64, y: f64, geom: &GeoM) -> DrawOptions {
    let mut opts = DrawOptions::default();
    opts.scale_with_color(color);
    opts.geom.translate(x, y);
    opts.geom.concat(geom);
    opts
}

/// Horizontal band of the cell tile, `fraction` of its height, `offset`
/// pixels below the cell top
fn band(color: Rgba, x: f64, y: f64, fraction: f64, offset: f64, geom: &GeoM) -> DrawOptions {
    let mut opts = DrawOptions::default();
    opts.scale_with_color(color);
    opts.geom.scale(1.0, fraction);
    opts.geom.translate(x, y + offset);
    opts.geom.concat(geom);
    opts
}

pub(crate) fn draw(dst: &mut Image, cells: &[Cell], params: &DrawParams, now_ms: u64) {
    let tile = params.cell_image.as_ref();
    let height = params.cell_size.1 as f64;
    let geom = &params.geom;
    let text_blink = blink_phase(now_ms, params.blink_text_ms);

    for cell in cells.iter().filter(|c| c.synced) {
        let x = cell.point.x as f64;
        let y = cell.point.y as f64;

        dst.draw_image(tile, &options(cell.bg, x, y, geom));

        if !(cell.attrs.contains(AttrMask::BLINK) && text_blink) {
            let fg = options(cell.fg, x, y, geom);
            if let Some(glyph) = &cell.glyph {
                dst.draw_image(glyph, &fg);
            }
            for glyph in &cell.combining_glyphs {
                dst.draw_image(glyph, &fg);
            }
        }

        if cell.attrs.contains(AttrMask::UNDERLINE) {
            let opts = band(cell.fg, x, y, 1.0 / 16.0, height * 7.0 / 8.0, geom);
            dst.draw_image(tile, &opts);
        }

        if cell.attrs.contains(AttrMask::STRIKE_THROUGH) {
            let opts = band(cell.fg, x, y, 1.0 / 16.0, height / 2.0 - height / 32.0, geom);
            dst.draw_image(tile, &opts);
        }
    }

    draw_cursor(dst, params, now_ms);
}

fn draw_cursor(dst: &mut Image, params: &DrawParams, now_ms: u64) {
    let cursor = &params.cursor;
    let (cols, rows) = params.grid_size;
    if !cursor.is_visible_in(cols, rows) {
        return;
    }

    if cursor.style.blinks() && blink_phase(now_ms, params.blink_cursor_ms) {
        return;
    }

    let (cw, ch) = params.cell_size;
    let x = (cursor.x as usize * cw) as f64;
    let y = (cursor.y as usize * ch) as f64;
    let height = ch as f64;
    let color = match cursor.color.rgb() {
        Some((r, g, b)) => Rgba::opaque(r, g, b),
        None => Rgba::WHITE,
    };

    let opts = match cursor.style.shape() {
        CursorShape::Solid => options(color, x, y, &params.geom),
        CursorShape::Block => DrawOptions {
            blend: Blend::Subtract,
            ..options(color, x, y, &params.geom)
        },
        CursorShape::Underline => band(color, x, y, 1.0 / 8.0, height * 7.0 / 8.0, &params.geom),
        CursorShape::Bar => band(color, x, y, 1.0 / 4.0, 0.0, &params.geom),
    };
    dst.draw_image(&params.cell_image, &opts);
}
