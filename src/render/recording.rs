use super::Painter;
use crate::types::{Point, Rgb};

#[derive(Clone, Debug, PartialEq)]
pub enum Draw {
    Clear(Rgb),
    GlowPoint { center: Point, radius: i32 },
    GlowLine { from: Point, to: Point, thickness: i32 },
    Polygon { points: Vec<Point>, width: i32 },
    Polyline { points: Vec<Point>, width: i32 },
}

/// Painter that records calls instead of rasterizing them.
pub struct RecordingPainter {
    width: u32,
    height: u32,
    pub draws: Vec<Draw>,
}

impl RecordingPainter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            draws: Vec::new(),
        }
    }

    pub fn glow_points(&self) -> Vec<(Point, i32)> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::GlowPoint { center, radius } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    pub fn glow_lines(&self) -> Vec<(Point, Point, i32)> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::GlowLine {
                    from,
                    to,
                    thickness,
                } => Some((*from, *to, *thickness)),
                _ => None,
            })
            .collect()
    }

    pub fn polygons(&self) -> Vec<&[Point]> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Polygon { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn polylines(&self) -> Vec<&[Point]> {
        self.draws
            .iter()
            .filter_map(|d| match d {
                Draw::Polyline { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }
}

impl Painter for RecordingPainter {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgb) {
        self.draws.push(Draw::Clear(color));
    }

    fn draw_glow_point(&mut self, _color: Rgb, center: Point, radius: i32) {
        self.draws.push(Draw::GlowPoint { center, radius });
    }

    fn draw_glow_line(&mut self, _color: Rgb, from: Point, to: Point, thickness: i32) {
        self.draws.push(Draw::GlowLine {
            from,
            to,
            thickness,
        });
    }

    fn draw_polygon(&mut self, _color: Rgb, points: &[Point], width: i32) {
        self.draws.push(Draw::Polygon {
            points: points.to_vec(),
            width,
        });
    }

    fn draw_polyline(&mut self, _color: Rgb, points: &[Point], width: i32) {
        self.draws.push(Draw::Polyline {
            points: points.to_vec(),
            width,
        });
    }
}
