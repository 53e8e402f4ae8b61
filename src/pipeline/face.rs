use crate::render::{Painter, project};
use crate::types::{FaceLandmarks, Point, Rgb};

/// Lip separation in canvas pixels above which the mouth is drawn open.
pub const MOUTH_OPEN_THRESHOLD: f32 = 20.0;
/// Vertical nudge applied to the outline when the mouth is drawn closed.
pub const CLOSED_MOUTH_OFFSET: i32 = 5;
/// Positions in the projected mouth outline that move up for the closed mouth;
/// every other position moves down.
const CLOSED_MOUTH_RAISED: [usize; 3] = [2, 3, 4];

pub const UPPER_LIP: usize = 13;
pub const LOWER_LIP: usize = 14;

const OUTLINE_WIDTH: i32 = 2;
const PUPIL_RADIUS: i32 = 3;
const BROW_THICKNESS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum FaceFeature {
    LeftEye,
    RightEye,
    Mouth,
    LeftEyebrow,
    RightEyebrow,
}

const FEATURE_INDICES: [&[usize]; FaceFeature::COUNT] = [
    &[33, 159, 133, 145, 153, 157],
    &[362, 386, 263, 374, 380, 385],
    &[61, 291, 39, 181, 84, 17, 314, 405, 321, 375, 291],
    &[70, 63, 105, 66, 107],
    &[336, 296, 334, 293, 300],
];

impl FaceFeature {
    pub const COUNT: usize = 5;
    pub const EYES: [FaceFeature; 2] = [FaceFeature::LeftEye, FaceFeature::RightEye];
    pub const EYEBROWS: [FaceFeature; 2] = [FaceFeature::LeftEyebrow, FaceFeature::RightEyebrow];

    /// Face mesh indices tracing this feature, in drawing order.
    pub fn indices(self) -> &'static [usize] {
        FEATURE_INDICES[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthState {
    Open,
    Closed,
}

impl MouthState {
    /// Lip separation in pixels for a canvas of the given height.
    pub fn openness(upper_y: f32, lower_y: f32, canvas_height: u32) -> f32 {
        (lower_y - upper_y) * canvas_height as f32
    }

    pub fn from_lips(upper_y: f32, lower_y: f32, canvas_height: u32) -> Self {
        if Self::openness(upper_y, lower_y, canvas_height) > MOUTH_OPEN_THRESHOLD {
            MouthState::Open
        } else {
            MouthState::Closed
        }
    }
}

/// Draws eyes, mouth and eyebrows from face mesh landmarks.
pub struct FaceComposer {
    color: Rgb,
    points: Vec<Point>,
}

impl FaceComposer {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            points: Vec::with_capacity(16),
        }
    }

    pub fn render_face<P: Painter>(&mut self, painter: &mut P, face: Option<&FaceLandmarks>) {
        let Some(face) = face else {
            return;
        };
        if face.is_empty() {
            return;
        }

        for eye in FaceFeature::EYES {
            self.project_feature(painter, face, eye);
            painter.draw_polygon(self.color, &self.points, OUTLINE_WIDTH);
            if let Some(pupil) = mean_point(&self.points) {
                painter.draw_glow_point(self.color, pupil, PUPIL_RADIUS);
            }
        }

        let (_, height) = painter.dimensions();
        let state = MouthState::from_lips(face.get(UPPER_LIP).y, face.get(LOWER_LIP).y, height);
        self.project_feature(painter, face, FaceFeature::Mouth);
        match state {
            MouthState::Open => painter.draw_polygon(self.color, &self.points, OUTLINE_WIDTH),
            MouthState::Closed => {
                flatten_closed_mouth(&mut self.points);
                painter.draw_polyline(self.color, &self.points, OUTLINE_WIDTH);
            }
        }

        for brow in FaceFeature::EYEBROWS {
            self.project_feature(painter, face, brow);
            if let (Some(&first), Some(&last)) = (self.points.first(), self.points.last()) {
                painter.draw_glow_line(self.color, first, last, BROW_THICKNESS);
            }
        }
    }

    fn project_feature<P: Painter>(&mut self, painter: &P, face: &FaceLandmarks, feature: FaceFeature) {
        let (width, height) = painter.dimensions();
        self.points.clear();
        self.points.extend(
            feature
                .indices()
                .iter()
                .map(|&idx| project(face.get(idx), width, height)),
        );
    }
}

/// Integer mean of the points, rounding toward negative infinity.
fn mean_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as i64;
    let (sx, sy) = points.iter().fold((0i64, 0i64), |acc, p| {
        (acc.0 + i64::from(p.x), acc.1 + i64::from(p.y))
    });
    // The mean of i32 values is itself in i32 range.
    Some(Point::new(sx.div_euclid(n) as i32, sy.div_euclid(n) as i32))
}

fn flatten_closed_mouth(points: &mut [Point]) {
    for (i, p) in points.iter_mut().enumerate() {
        let dy = if CLOSED_MOUTH_RAISED.contains(&i) {
            -CLOSED_MOUTH_OFFSET
        } else {
            CLOSED_MOUTH_OFFSET
        };
        *p = p.offset(0, dy);
    }
}
