pub mod canvas;
pub mod glow;
pub mod projector;
pub mod raster;

pub use canvas::Canvas;
pub use projector::project;

use crate::types::{Point, Rgb};

/// Drawing operations the composers need from a surface.
pub trait Painter {
    fn dimensions(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgb);

    /// Filled disc with a translucent halo underneath.
    fn draw_glow_point(&mut self, color: Rgb, center: Point, radius: i32);

    /// Stroked segment with a translucent halo underneath.
    fn draw_glow_line(&mut self, color: Rgb, from: Point, to: Point, thickness: i32);

    /// Closed outline, not filled.
    fn draw_polygon(&mut self, color: Rgb, points: &[Point], width: i32);

    /// Open outline through `points` in order.
    fn draw_polyline(&mut self, color: Rgb, points: &[Point], width: i32);
}

#[cfg(test)]
pub(crate) mod recording;
