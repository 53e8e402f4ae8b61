use image::RgbaImage;
use rayon::prelude::*;

use super::Painter;
use super::glow::{line_layers, point_layers};
use super::raster::{self, Bounds};
use crate::config::GlowConfig;
use crate::types::{Point, Rgb};

/// Extra margin around a glow disc, mirroring the overlay surface size
/// `2 * radius + 4` used for each halo layer.
const GLOW_POINT_PADDING: i32 = 2;

/// RGBA8 drawing surface with a reusable coverage mask for translucent layers.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    // One byte per pixel, all zero between layer composites.
    mask: Vec<u8>,
    glow: GlowConfig,
}

impl Canvas {
    pub fn new(width: u32, height: u32, glow: GlowConfig) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = vec![0u8; len * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
            mask: vec![0u8; len],
            glow,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn glow(&self) -> &GlowConfig {
        &self.glow
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let idx = self.index(x, y)?;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.pixels[idx * 4..idx * 4 + 4]);
        Some(out)
    }

    pub fn to_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Packs the canvas as `0RGB` words into `out`, reusing its allocation.
    pub fn write_0rgb(&self, out: &mut Vec<u32>) {
        out.resize(self.width as usize * self.height as usize, 0);
        out.par_iter_mut()
            .zip(self.pixels.par_chunks_exact(4))
            .for_each(|(dst, px)| {
                *dst = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
            });
    }

    pub fn fill_circle(&mut self, color: Rgb, center: Point, radius: i32) {
        let rgba = color.rgba();
        let clip = Bounds::canvas(self.width, self.height);
        raster::circle(center, radius, clip, |x, y| self.put_pixel_safe(x, y, rgba));
    }

    pub fn stroke_line(&mut self, color: Rgb, from: Point, to: Point, thickness: i32) {
        let rgba = color.rgba();
        let clip = Bounds::canvas(self.width, self.height);
        raster::thick_line(from, to, thickness, clip, |x, y| self.put_pixel_safe(x, y, rgba));
    }

    /// Blends one translucent disc onto the canvas.
    pub(super) fn blend_circle(&mut self, color: Rgb, center: Point, radius: i32, alpha: u8) {
        let Some(bounds) = Bounds::around_circle(center, radius, GLOW_POINT_PADDING)
            .clip(self.width, self.height)
        else {
            return;
        };
        let width = self.width as usize;
        let mask = &mut self.mask;
        raster::circle(center, radius, bounds, |x, y| {
            mask[y as usize * width + x as usize] = 1;
        });
        self.composite_mask(bounds, color, alpha);
    }

    /// Blends one translucent thick line onto the canvas.
    pub(super) fn blend_line(&mut self, color: Rgb, from: Point, to: Point, thickness: i32, alpha: u8) {
        let Some(bounds) = Bounds::around_line(from, to, thickness).clip(self.width, self.height)
        else {
            return;
        };
        let width = self.width as usize;
        let mask = &mut self.mask;
        raster::thick_line(from, to, thickness, bounds, |x, y| {
            mask[y as usize * width + x as usize] = 1;
        });
        self.composite_mask(bounds, color, alpha);
    }

    // Each covered pixel is blended exactly once, then the mask is reset.
    fn composite_mask(&mut self, bounds: Bounds, color: Rgb, alpha: u8) {
        let width = self.width as usize;
        let src = color.rgba();
        let a = u32::from(alpha);
        for y in bounds.min_y..=bounds.max_y {
            let row = y as usize * width;
            for x in bounds.min_x..=bounds.max_x {
                let idx = row + x as usize;
                if self.mask[idx] == 0 {
                    continue;
                }
                self.mask[idx] = 0;
                let px = &mut self.pixels[idx * 4..idx * 4 + 3];
                for (dst, s) in px.iter_mut().zip(src) {
                    *dst = blend_channel(u32::from(s), u32::from(*dst), a);
                }
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (ux, uy) = (x as u32, y as u32);
        if ux >= self.width || uy >= self.height {
            return None;
        }
        Some((uy * self.width + ux) as usize)
    }

    fn put_pixel_safe(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color);
        }
    }
}

fn blend_channel(src: u32, dst: u32, alpha: u32) -> u8 {
    ((src * alpha + dst * (255 - alpha) + 127) / 255) as u8
}

impl Painter for Canvas {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        let rgba = color.rgba();
        self.pixels
            .par_chunks_exact_mut(4)
            .for_each(|px| px.copy_from_slice(&rgba));
    }

    fn draw_glow_point(&mut self, color: Rgb, center: Point, radius: i32) {
        let glow = self.glow;
        for layer in point_layers(&glow) {
            self.blend_circle(color, center, radius + layer.grow, layer.alpha);
        }
        self.fill_circle(color, center, radius);
    }

    fn draw_glow_line(&mut self, color: Rgb, from: Point, to: Point, thickness: i32) {
        let glow = self.glow;
        for layer in line_layers(&glow) {
            self.blend_line(color, from, to, thickness + layer.grow, layer.alpha);
        }
        self.stroke_line(color, from, to, thickness);
    }

    fn draw_polygon(&mut self, color: Rgb, points: &[Point], width: i32) {
        self.draw_polyline(color, points, width);
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if points.len() > 2 {
                self.stroke_line(color, last, first, width);
            }
        }
    }

    fn draw_polyline(&mut self, color: Rgb, points: &[Point], width: i32) {
        for pair in points.windows(2) {
            self.stroke_line(color, pair[0], pair[1], width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb(255, 255, 255);

    fn canvas() -> Canvas {
        Canvas::new(64, 48, GlowConfig::default())
    }

    #[test]
    fn new_canvas_is_opaque_black() {
        let c = canvas();
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(c.pixel(63, 47), Some([0, 0, 0, 255]));
        assert_eq!(c.pixel(64, 0), None);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut c = canvas();
        c.clear(Rgb(10, 20, 30));
        assert!(c.as_rgba().chunks_exact(4).all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn blend_uses_alpha() {
        let mut c = canvas();
        c.blend_circle(WHITE, Point::new(10, 10), 2, 100);
        let [r, g, b, a] = c.pixel(10, 10).unwrap();
        assert_eq!((r, g, b, a), (100, 100, 100, 255));
        assert!(c.mask.iter().all(|&m| m == 0));
    }

    #[test]
    fn overlapping_stamps_blend_once() {
        let mut c = canvas();
        c.blend_line(WHITE, Point::new(5, 5), Point::new(30, 5), 6, 100);
        assert_eq!(c.pixel(15, 5), Some([100, 100, 100, 255]));
        assert_eq!(c.pixel(15, 7), Some([100, 100, 100, 255]));
    }

    #[test]
    fn offscreen_primitives_are_clipped() {
        let mut c = canvas();
        c.draw_glow_point(WHITE, Point::new(-500, 900), 20);
        c.draw_glow_line(WHITE, Point::new(-100, -100), Point::new(-10, -20), 4);
        c.draw_glow_point(WHITE, Point::new(63, 47), 10);
        assert_eq!(c.pixel(63, 47), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn saturated_coordinates_are_drawn_without_overflow() {
        let mut c = canvas();
        let far = Point::new(i32::MAX, 20);
        c.draw_glow_line(WHITE, Point::new(30, 20), far, 4);
        c.draw_glow_point(WHITE, far, 3);
        c.draw_polygon(WHITE, &[Point::new(i32::MIN, 0), far, Point::new(5, i32::MAX)], 2);
        assert_eq!(c.pixel(63, 20), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(29, 40), Some([0, 0, 0, 255]));
        assert!(c.mask.iter().all(|&m| m == 0));
    }

    #[test]
    fn polygon_closes_outline() {
        let mut c = canvas();
        let square = [
            Point::new(10, 10),
            Point::new(20, 10),
            Point::new(20, 20),
            Point::new(10, 20),
        ];
        c.draw_polygon(WHITE, &square, 1);
        assert_eq!(c.pixel(10, 15), Some([255, 255, 255, 255]));
        assert_eq!(c.pixel(15, 15), Some([0, 0, 0, 255]));

        let mut open = canvas();
        open.draw_polyline(WHITE, &square, 1);
        assert_eq!(open.pixel(10, 15), Some([0, 0, 0, 255]));
        assert_eq!(open.pixel(20, 15), Some([255, 255, 255, 255]));
    }

    #[test]
    fn write_0rgb_packs_channels() {
        let mut c = Canvas::new(2, 1, GlowConfig::default());
        c.clear(Rgb(0x12, 0x34, 0x56));
        let mut out = Vec::new();
        c.write_0rgb(&mut out);
        assert_eq!(out, vec![0x0012_3456, 0x0012_3456]);
    }
}
