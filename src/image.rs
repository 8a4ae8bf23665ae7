//! Framebuffer Images
//!
//! A minimal RGBA8 image plus an affine blit. Glyphs, the background tile
//! and the output framebuffer are all [`Image`]s; every draw call goes
//! through [`Image::draw_image`] with a transform, a color scale and a
//! blend mode.

use crate::geom::GeoM;

/// An RGBA pixel with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pack as `0x00RRGGBB`, the layout used by CPU presentation surfaces
    pub fn to_xrgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

/// How a source pixel combines with the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Blend {
    /// Ordinary alpha compositing
    #[default]
    SourceOver,
    /// `rgb = src - dst`, `alpha = src`. With a white source this inverts
    /// whatever is underneath.
    Subtract,
}

/// Options for a single [`Image::draw_image`] call
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub geom: GeoM,
    /// Per-channel multipliers applied to source pixels
    pub color_scale: [f32; 4],
    pub blend: Blend,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            geom: GeoM::IDENTITY,
            color_scale: [1.0; 4],
            blend: Blend::SourceOver,
        }
    }
}

impl DrawOptions {
    /// Multiply the color scale by `color`
    pub fn scale_with_color(&mut self, color: Rgba) {
        let c = [color.r, color.g, color.b, color.a];
        for (scale, channel) in self.color_scale.iter_mut().zip(c) {
            *scale *= channel as f32 / 255.0;
        }
    }
}

/// An RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Image {
    /// A fully transparent image
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgba::TRANSPARENT);
    }

    /// Draw `src` onto this image through `opts.geom`
    ///
    /// Each destination pixel center inside the transformed source bounds is
    /// mapped back into the source and sampled (nearest neighbour).
    pub fn draw_image(&mut self, src: &Image, opts: &DrawOptions) {
        if src.width == 0 || src.height == 0 || self.width == 0 || self.height == 0 {
            return;
        }
        let Some(inverse) = opts.geom.inverted() else {
            return;
        };

        let (sw, sh) = (src.width as f64, src.height as f64);
        let corners = [
            opts.geom.apply(0.0, 0.0),
            opts.geom.apply(sw, 0.0),
            opts.geom.apply(0.0, sh),
            opts.geom.apply(sw, sh),
        ];
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for (x, y) in corners {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let (u, v) = inverse.apply(px as f64 + 0.5, py as f64 + 0.5);
                if u < 0.0 || v < 0.0 || u >= sw || v >= sh {
                    continue;
                }
                let s = src.pixels[v as usize * src.width + u as usize];
                let scaled = [
                    s.r as f32 * opts.color_scale[0],
                    s.g as f32 * opts.color_scale[1],
                    s.b as f32 * opts.color_scale[2],
                    s.a as f32 * opts.color_scale[3],
                ];
                if scaled[3] <= 0.0 {
                    continue;
                }
                let dst = &mut self.pixels[py * self.width + px];
                *dst = blend(opts.blend, scaled, *dst);
            }
        }
    }
}

fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn blend(mode: Blend, src: [f32; 4], dst: Rgba) -> Rgba {
    let alpha = (src[3] / 255.0).min(1.0);
    match mode {
        Blend::SourceOver => {
            let mix = |s: f32, d: u8| s * alpha + d as f32 * (1.0 - alpha);
            Rgba::new(
                to_channel(mix(src[0], dst.r)),
                to_channel(mix(src[1], dst.g)),
                to_channel(mix(src[2], dst.b)),
                to_channel(src[3] + dst.a as f32 * (1.0 - alpha)),
            )
        }
        Blend::Subtract => {
            let sub = |s: f32, d: u8| s * alpha - d as f32;
            Rgba::new(
                to_channel(sub(src[0], dst.r)),
                to_channel(sub(src[1], dst.g)),
                to_channel(sub(src[2], dst.b)),
                to_channel(src[3]),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_translated_tile() {
        let mut dst = Image::new(8, 8);
        let tile = Image::filled(2, 3, Rgba::WHITE);

        let mut opts = DrawOptions::default();
        opts.geom.translate(4.0, 2.0);
        opts.scale_with_color(Rgba::opaque(255, 0, 0));
        dst.draw_image(&tile, &opts);

        assert_eq!(dst.pixel(4, 2), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(dst.pixel(5, 4), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(dst.pixel(6, 2), Some(Rgba::TRANSPARENT));
        assert_eq!(dst.pixel(4, 5), Some(Rgba::TRANSPARENT));
        assert_eq!(dst.pixel(3, 2), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_draw_scaled_band() {
        let mut dst = Image::new(4, 16);
        let tile = Image::filled(4, 16, Rgba::WHITE);

        // Bottom eighth of the tile
        let mut opts = DrawOptions::default();
        opts.geom.scale(1.0, 1.0 / 8.0);
        opts.geom.translate(0.0, 14.0);
        dst.draw_image(&tile, &opts);

        for y in 0..16 {
            let expected = if y >= 14 { Rgba::WHITE } else { Rgba::TRANSPARENT };
            assert_eq!(dst.pixel(0, y), Some(expected), "row {}", y);
        }
    }

    #[test]
    fn test_draw_clips_to_destination() {
        let mut dst = Image::new(2, 2);
        let tile = Image::filled(4, 4, Rgba::WHITE);
        let mut opts = DrawOptions::default();
        opts.geom.translate(-1.0, -1.0);
        dst.draw_image(&tile, &opts);
        assert!(dst.pixels().iter().all(|p| *p == Rgba::WHITE));
    }

    #[test]
    fn test_source_over_uses_alpha() {
        let mut dst = Image::filled(1, 1, Rgba::BLACK);
        let glyph = Image::filled(1, 1, Rgba::new(255, 255, 255, 0));
        dst.draw_image(&glyph, &DrawOptions::default());
        assert_eq!(dst.pixel(0, 0), Some(Rgba::BLACK));

        let half = Image::filled(1, 1, Rgba::new(255, 255, 255, 128));
        dst.draw_image(&half, &DrawOptions::default());
        let p = dst.pixel(0, 0).unwrap();
        assert!(p.r > 120 && p.r < 135);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn test_subtract_inverts() {
        let mut dst = Image::filled(1, 1, Rgba::opaque(200, 50, 0));
        let tile = Image::filled(1, 1, Rgba::WHITE);
        let opts = DrawOptions {
            blend: Blend::Subtract,
            ..DrawOptions::default()
        };
        dst.draw_image(&tile, &opts);
        assert_eq!(dst.pixel(0, 0), Some(Rgba::opaque(55, 205, 255)));
    }

    #[test]
    fn test_xrgb_packing() {
        assert_eq!(Rgba::opaque(0x12, 0x34, 0x56).to_xrgb(), 0x123456);
    }
}
