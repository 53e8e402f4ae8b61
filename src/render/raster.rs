use crate::types::Point;

/// Visits every pixel of a filled disc that falls inside `clip`.
pub fn circle(center: Point, radius: i32, clip: Bounds, mut plot: impl FnMut(i32, i32)) {
    let r = i64::from(radius.max(0));
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    let r2 = r * r;
    let (min_x, max_x) = ((cx - r).max(i64::from(clip.min_x)), (cx + r).min(i64::from(clip.max_x)));
    let (min_y, max_y) = ((cy - r).max(i64::from(clip.min_y)), (cy + r).min(i64::from(clip.max_y)));
    for y in min_y..=max_y {
        let dy = y - cy;
        for x in min_x..=max_x {
            let dx = x - cx;
            if dx * dx + dy * dy <= r2 {
                plot(x as i32, y as i32);
            }
        }
    }
}

/// Visits every pixel of a line of the given thickness that falls inside `clip`.
///
/// The centre line is walked with Bresenham and stamped with a disc whose
/// diameter matches `thickness`. Pixels may be visited more than once. The
/// walk is limited to the part of the segment within brush reach of `clip`.
pub fn thick_line(p0: Point, p1: Point, thickness: i32, clip: Bounds, mut plot: impl FnMut(i32, i32)) {
    let radius = brush_radius(thickness);
    let Some(((mut x0, mut y0), (x1, y1))) = clip_segment(p0, p1, clip.grow(radius + 1)) else {
        return;
    };
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(x0, y0, radius, thickness, clip, &mut plot);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Half-extent of the brush used for a stroke, in pixels.
pub fn brush_radius(thickness: i32) -> i32 {
    (thickness.max(1)) / 2
}

type Endpoint = (i64, i64);

/// Liang-Barsky clip of `p0 -> p1` against `area`. Segments already inside
/// are returned untouched so the Bresenham walk matches the unclipped one.
fn clip_segment(p0: Point, p1: Point, area: Bounds) -> Option<(Endpoint, Endpoint)> {
    let start = (i64::from(p0.x), i64::from(p0.y));
    let end = (i64::from(p1.x), i64::from(p1.y));
    if area.contains(p0.x, p0.y) && area.contains(p1.x, p1.y) {
        return Some((start, end));
    }

    let (x0, y0) = (f64::from(p0.x), f64::from(p0.y));
    let (dx, dy) = (f64::from(p1.x) - x0, f64::from(p1.y) - y0);
    let edges = [
        (-dx, x0 - f64::from(area.min_x)),
        (dx, f64::from(area.max_x) - x0),
        (-dy, y0 - f64::from(area.min_y)),
        (dy, f64::from(area.max_y) - y0),
    ];
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

fn stamp(x: i64, y: i64, radius: i32, thickness: i32, clip: Bounds, plot: &mut impl FnMut(i32, i32)) {
    let radius = i64::from(radius);
    // (2d)^2 <= t^2 keeps the brush round for both odd and even widths.
    let t2 = i64::from(thickness) * i64::from(thickness);
    for oy in -radius..=radius {
        for ox in -radius..=radius {
            if radius > 0 && 4 * (ox * ox + oy * oy) > t2 {
                continue;
            }
            let (px, py) = (x + ox, y + oy);
            if clip.contains_wide(px, py) {
                plot(px as i32, py as i32);
            }
        }
    }
}

/// Axis-aligned pixel rectangle, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Every pixel of a `width` x `height` canvas.
    pub fn canvas(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width as i32 - 1,
            max_y: height as i32 - 1,
        }
    }

    pub fn around_circle(center: Point, radius: i32, padding: i32) -> Self {
        Self::around(center, center, radius.max(0) + padding)
    }

    pub fn around_line(p0: Point, p1: Point, thickness: i32) -> Self {
        Self::around(p0, p1, brush_radius(thickness) + 1)
    }

    fn around(p0: Point, p1: Point, extent: i32) -> Self {
        Self {
            min_x: p0.x.min(p1.x).saturating_sub(extent),
            min_y: p0.y.min(p1.y).saturating_sub(extent),
            max_x: p0.x.max(p1.x).saturating_add(extent),
            max_y: p0.y.max(p1.y).saturating_add(extent),
        }
    }

    pub fn grow(self, by: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(by),
            min_y: self.min_y.saturating_sub(by),
            max_x: self.max_x.saturating_add(by),
            max_y: self.max_y.saturating_add(by),
        }
    }

    /// Intersection with a `width` x `height` canvas, `None` when fully outside.
    pub fn clip(self, width: u32, height: u32) -> Option<Self> {
        let min_x = self.min_x.max(0);
        let min_y = self.min_y.max(0);
        let max_x = self.max_x.min(width as i32 - 1);
        let max_y = self.max_y.min(height as i32 - 1);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.contains_wide(x.into(), y.into())
    }

    fn contains_wide(&self, x: i64, y: i64) -> bool {
        x >= i64::from(self.min_x)
            && x <= i64::from(self.max_x)
            && y >= i64::from(self.min_y)
            && y <= i64::from(self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: Bounds = Bounds {
        min_x: -100,
        min_y: -100,
        max_x: 100,
        max_y: 100,
    };

    #[test]
    fn circle_is_symmetric() {
        let mut pixels = Vec::new();
        circle(Point::new(10, 10), 3, OPEN, |x, y| pixels.push((x, y)));
        assert!(pixels.contains(&(13, 10)));
        assert!(pixels.contains(&(7, 10)));
        assert!(pixels.contains(&(10, 13)));
        assert!(pixels.contains(&(10, 7)));
        assert!(!pixels.contains(&(13, 13)));
    }

    #[test]
    fn zero_radius_circle_is_one_pixel() {
        let mut pixels = Vec::new();
        circle(Point::new(-4, 2), 0, OPEN, |x, y| pixels.push((x, y)));
        assert_eq!(pixels, vec![(-4, 2)]);
    }

    #[test]
    fn thin_line_hits_both_endpoints() {
        let mut pixels = Vec::new();
        thick_line(Point::new(0, 0), Point::new(5, 3), 1, OPEN, |x, y| pixels.push((x, y)));
        assert_eq!(pixels.first(), Some(&(0, 0)));
        assert_eq!(pixels.last(), Some(&(5, 3)));
        assert_eq!(pixels.len(), 6);
    }

    #[test]
    fn thick_line_widens_perpendicular() {
        let mut pixels = Vec::new();
        thick_line(Point::new(0, 0), Point::new(10, 0), 4, OPEN, |x, y| pixels.push((x, y)));
        assert!(pixels.contains(&(5, 2)));
        assert!(pixels.contains(&(5, -2)));
        assert!(!pixels.contains(&(5, 3)));
    }

    #[test]
    fn clip_discards_offscreen_bounds() {
        let b = Bounds::around_circle(Point::new(-50, -50), 10, 2);
        assert_eq!(b.clip(100, 100), None);

        let partial = Bounds::around_circle(Point::new(0, 99), 5, 0).clip(100, 100);
        assert_eq!(
            partial,
            Some(Bounds {
                min_x: 0,
                min_y: 94,
                max_x: 5,
                max_y: 99
            })
        );
    }

    #[test]
    fn circle_only_visits_clip() {
        let mut pixels = Vec::new();
        circle(Point::new(0, 0), 5, Bounds::canvas(3, 2), |x, y| pixels.push((x, y)));
        assert_eq!(pixels.len(), 6);
        assert!(pixels.iter().all(|&(x, y)| (0..3).contains(&x) && (0..2).contains(&y)));
    }

    #[test]
    fn saturated_endpoint_is_walked_only_near_canvas() {
        let clip = Bounds::canvas(800, 600);
        let mut visits = 0usize;
        let mut rightmost = i32::MIN;
        thick_line(Point::new(400, 300), Point::new(i32::MAX, 300), 4, clip, |x, y| {
            visits += 1;
            rightmost = rightmost.max(x);
            assert!(clip.contains(x, y));
        });
        assert_eq!(rightmost, 799);
        assert!(visits < 10_000, "{visits} visits");

        let mut far = 0usize;
        thick_line(Point::new(i32::MIN, -5), Point::new(i32::MAX, -5), 4, clip, |_, _| far += 1);
        assert_eq!(far, 0);
        circle(Point::new(i32::MAX, i32::MAX), 40, clip, |_, _| far += 1);
        assert_eq!(far, 0);
    }

    #[test]
    fn inside_segment_is_not_moved_by_clipping() {
        let area = Bounds::canvas(50, 50);
        let seg = clip_segment(Point::new(3, 4), Point::new(40, 17), area);
        assert_eq!(seg, Some(((3, 4), (40, 17))));
        let cut = clip_segment(Point::new(-10, 10), Point::new(60, 10), area);
        assert_eq!(cut, Some(((0, 10), (49, 10))));
        assert_eq!(clip_segment(Point::new(-10, -1), Point::new(60, -1), area), None);
    }

    #[test]
    fn extreme_bounds_saturate() {
        let b = Bounds::around_circle(Point::new(i32::MAX, 0), 10, 2);
        assert_eq!(b.max_x, i32::MAX);
        assert_eq!(b.clip(800, 600), None);
    }
}
