use crate::types::{Landmark, Point};

/// Maps a normalized landmark to canvas pixels.
///
/// Coordinates are scaled and truncated toward zero. Nothing is clamped, so a
/// landmark outside `[0, 1]` lands outside the canvas.
pub fn project(landmark: &Landmark, width: u32, height: u32) -> Point {
    project_xy(landmark.x, landmark.y, width, height)
}

pub fn project_xy(x: f32, y: f32, width: u32, height: u32) -> Point {
    Point::new((x * width as f32) as i32, (y * height as f32) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_maps_inside_canvas() {
        let samples = [0.0, 0.001, 0.25, 0.5, 0.999, 1.0];
        for &x in &samples {
            for &y in &samples {
                let p = project(&Landmark::new(x, y, 0.0, 1.0), 800, 600);
                assert!((0..=800).contains(&p.x), "x {x} -> {}", p.x);
                assert!((0..=600).contains(&p.y), "y {y} -> {}", p.y);
            }
        }
    }

    #[test]
    fn truncates_fractional_pixels() {
        let p = project(&Landmark::new(0.50124, 0.2499, 0.0, 1.0), 800, 600);
        assert_eq!(p, Point::new(400, 149));
    }

    #[test]
    fn out_of_range_is_not_clamped() {
        let p = project(&Landmark::new(1.5, -0.25, 0.0, 1.0), 800, 600);
        assert_eq!(p, Point::new(1200, -150));
        // Truncation is toward zero on the negative side as well.
        let q = project(&Landmark::new(-0.0013, 0.0, 0.0, 1.0), 800, 600);
        assert_eq!(q, Point::new(-1, 0));
    }

    #[test]
    fn projection_is_deterministic() {
        let lm = Landmark::new(0.3172, 0.8841, 0.0, 0.2);
        assert_eq!(project(&lm, 800, 600), project(&lm, 800, 600));
    }
}
