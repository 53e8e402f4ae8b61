use super::face::FaceComposer;
use crate::config::StyleConfig;
use crate::render::{Painter, project};
use crate::types::{FaceLandmarks, Landmark, PoseIndex, PoseLandmarks};

/// Joints at or below this visibility are not drawn.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;
pub const BONE_THICKNESS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointKind {
    Head,
    Body,
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
}

const JOINT_RADII: [i32; JointKind::COUNT] = [25, 35, 20, 15, 12, 20, 15, 12];

impl JointKind {
    pub const COUNT: usize = 8;

    pub fn radius(self) -> i32 {
        JOINT_RADII[self as usize]
    }
}

pub const JOINTS: [(PoseIndex, JointKind); 13] = [
    (PoseIndex::Nose, JointKind::Head),
    (PoseIndex::LeftShoulder, JointKind::Shoulder),
    (PoseIndex::RightShoulder, JointKind::Shoulder),
    (PoseIndex::LeftElbow, JointKind::Elbow),
    (PoseIndex::RightElbow, JointKind::Elbow),
    (PoseIndex::LeftWrist, JointKind::Wrist),
    (PoseIndex::RightWrist, JointKind::Wrist),
    (PoseIndex::LeftHip, JointKind::Hip),
    (PoseIndex::RightHip, JointKind::Hip),
    (PoseIndex::LeftKnee, JointKind::Knee),
    (PoseIndex::RightKnee, JointKind::Knee),
    (PoseIndex::LeftAnkle, JointKind::Ankle),
    (PoseIndex::RightAnkle, JointKind::Ankle),
];

pub const BONES: [(PoseIndex, PoseIndex); 12] = [
    // torso
    (PoseIndex::LeftShoulder, PoseIndex::RightShoulder),
    (PoseIndex::RightShoulder, PoseIndex::RightHip),
    (PoseIndex::RightHip, PoseIndex::LeftHip),
    (PoseIndex::LeftHip, PoseIndex::LeftShoulder),
    // arms
    (PoseIndex::RightShoulder, PoseIndex::RightElbow),
    (PoseIndex::RightElbow, PoseIndex::RightWrist),
    (PoseIndex::LeftShoulder, PoseIndex::LeftElbow),
    (PoseIndex::LeftElbow, PoseIndex::LeftWrist),
    // legs
    (PoseIndex::RightHip, PoseIndex::RightKnee),
    (PoseIndex::RightKnee, PoseIndex::RightAnkle),
    (PoseIndex::LeftHip, PoseIndex::LeftKnee),
    (PoseIndex::LeftKnee, PoseIndex::LeftAnkle),
];

pub fn is_visible(landmark: &Landmark) -> bool {
    landmark.visibility > VISIBILITY_THRESHOLD
}

/// Midpoint of the shoulders in normalized coordinates.
pub fn torso_center(pose: &PoseLandmarks) -> Landmark {
    pose.get(PoseIndex::LeftShoulder)
        .midpoint(pose.get(PoseIndex::RightShoulder))
}

/// Draws the glowing body skeleton and hands the face to [`FaceComposer`].
pub struct SkeletonComposer {
    style: StyleConfig,
    face: FaceComposer,
}

impl SkeletonComposer {
    pub fn new(style: StyleConfig) -> Self {
        let face = FaceComposer::new(style.glow_color);
        Self { style, face }
    }

    /// Renders one frame. Without pose landmarks the painter is left untouched,
    /// face landmarks included.
    pub fn render_skeleton<P: Painter>(
        &mut self,
        painter: &mut P,
        pose: Option<&PoseLandmarks>,
        face: Option<&FaceLandmarks>,
    ) {
        let Some(pose) = pose else {
            return;
        };
        if pose.is_empty() {
            return;
        }

        painter.clear(self.style.background);
        let (width, height) = painter.dimensions();
        let color = self.style.glow_color;

        for (start, end) in BONES {
            let from = project(pose.get(start), width, height);
            let to = project(pose.get(end), width, height);
            painter.draw_glow_line(color, from, to, BONE_THICKNESS);
        }

        // Drawn whenever a pose exists, whatever the shoulder visibility.
        let torso = project(&torso_center(pose), width, height);
        painter.draw_glow_point(color, torso, JointKind::Body.radius());

        for (index, kind) in JOINTS {
            let landmark = pose.get(index);
            if is_visible(landmark) {
                let center = project(landmark, width, height);
                painter.draw_glow_point(color, center, kind.radius());
            }
        }

        self.face.render_face(painter, face);
    }
}
