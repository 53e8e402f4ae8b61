use std::time::Instant;

use crate::error::{LandmarkKind, TopologyError};

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            rgba,
            width,
            height,
            timestamp: Instant::now(),
        }
    }
}

/// Pixel position on the canvas. May lie outside the canvas bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GLOW: Rgb = Rgb(200, 255, 250);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub const fn rgba(self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

/// Normalized landmark as produced by a detector.
///
/// `x` and `y` are fractions of the frame size, usually inside `[0, 1]` but
/// not clamped: a subject partially out of frame yields values outside that
/// range. Face landmarks have no confidence and carry `visibility = 1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    pub const fn face(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    pub fn midpoint(&self, other: &Landmark) -> Landmark {
        Landmark {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
            visibility: self.visibility.min(other.visibility),
        }
    }
}

/// Indices of the 33-point body pose topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseIndex {
    pub const COUNT: usize = 33;

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Body landmarks of a single subject for one frame.
#[derive(Clone, Debug)]
pub struct PoseLandmarks {
    landmarks: Vec<Landmark>,
}

impl PoseLandmarks {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, TopologyError> {
        if landmarks.len() < PoseIndex::COUNT {
            return Err(TopologyError {
                kind: LandmarkKind::Pose,
                expected: PoseIndex::COUNT,
                actual: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    pub fn get(&self, index: PoseIndex) -> &Landmark {
        &self.landmarks[index.index()]
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Face mesh landmarks of a single subject for one frame.
#[derive(Clone, Debug)]
pub struct FaceLandmarks {
    landmarks: Vec<Landmark>,
}

impl FaceLandmarks {
    pub const COUNT: usize = 468;
    pub const REFINED_COUNT: usize = 478;

    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, TopologyError> {
        if landmarks.len() < Self::COUNT {
            return Err(TopologyError {
                kind: LandmarkKind::Face,
                expected: Self::COUNT,
                actual: landmarks.len(),
            });
        }
        Ok(Self { landmarks })
    }

    pub fn get(&self, index: usize) -> &Landmark {
        &self.landmarks[index]
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Everything the detectors produced for one tick.
#[derive(Clone, Debug, Default)]
pub struct Detections {
    pub pose: Option<PoseLandmarks>,
    pub face: Option<FaceLandmarks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_landmarks_require_full_topology() {
        let err = PoseLandmarks::new(vec![Landmark::default(); 20]).unwrap_err();
        assert_eq!(err.expected, PoseIndex::COUNT);
        assert_eq!(err.actual, 20);
        assert!(PoseLandmarks::new(vec![Landmark::default(); 33]).is_ok());
    }

    #[test]
    fn face_landmarks_accept_refined_topology() {
        assert!(FaceLandmarks::new(vec![Landmark::default(); 467]).is_err());
        assert!(FaceLandmarks::new(vec![Landmark::default(); 468]).is_ok());
        let refined = FaceLandmarks::new(vec![Landmark::default(); 478]).unwrap();
        assert_eq!(refined.len(), FaceLandmarks::REFINED_COUNT);
    }

    #[test]
    fn pose_index_matches_topology() {
        assert_eq!(PoseIndex::Nose.index(), 0);
        assert_eq!(PoseIndex::LeftShoulder.index(), 11);
        assert_eq!(PoseIndex::RightAnkle.index(), 28);
        assert_eq!(PoseIndex::RightFootIndex.index(), PoseIndex::COUNT - 1);
    }

    #[test]
    fn midpoint_averages_coordinates() {
        let a = Landmark::new(0.2, 0.4, 0.0, 0.9);
        let b = Landmark::new(0.6, 0.2, 1.0, 0.1);
        let m = a.midpoint(&b);
        assert!((m.x - 0.4).abs() < 1e-6);
        assert!((m.y - 0.3).abs() < 1e-6);
        assert!((m.z - 0.5).abs() < 1e-6);
    }
}
