#[cfg(feature = "camera-nokhwa")]
pub mod camera;
pub mod detector;
pub mod face;
pub mod mirror;
pub mod rgba_converter;
pub mod skeleton;

use anyhow::Result;

use crate::types::Frame;

// Re-exports for convenience
#[cfg(feature = "camera-nokhwa")]
pub use camera::{Camera, CameraDevice, available_cameras};
pub use detector::{FaceDetector, NoFaceDetector, OrtFaceDetector, OrtPoseDetector, PoseDetector};
pub use face::FaceComposer;
pub use mirror::mirror_horizontal;
pub use skeleton::SkeletonComposer;

/// Anything that hands out RGBA frames one at a time.
pub trait FrameSource {
    fn read(&mut self) -> Result<Frame>;
}
