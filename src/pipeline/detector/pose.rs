use std::path::Path;

use anyhow::{Context, Result, anyhow};
use ort::session::Session;
use ort::value::Tensor;

use super::common::{self, LetterboxInfo, sigmoid};
use super::{ConfidenceGate, PoseDetector};
use crate::config::DetectorConfig;
use crate::error::{DetectorError, LandmarkKind, TopologyError};
use crate::types::{Frame, Landmark, PoseIndex, PoseLandmarks};

pub const POSE_INPUT_SIZE: u32 = 256;
/// x, y, z, visibility logit, presence logit
const VALUES_PER_LANDMARK: usize = 5;

/// MediaPipe pose landmark model on ONNX Runtime, run on the whole frame.
pub struct OrtPoseDetector {
    session: Session,
    gate: ConfidenceGate,
}

impl OrtPoseDetector {
    pub fn new(model_path: &Path, cfg: &DetectorConfig) -> Result<Self> {
        let session = common::load_session(model_path)?;
        log::info!("pose landmark model ready: {}", model_path.display());
        Ok(Self {
            session,
            gate: ConfidenceGate::new(cfg),
        })
    }

    fn infer(&mut self, frame: &Frame) -> Result<(Vec<f32>, f32, LetterboxInfo)> {
        let (input, letterbox) = common::prepare_frame_with_size(frame, POSE_INPUT_SIZE)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run pose landmark session")?;

        if outputs.len() < 2 {
            return Err(anyhow!(
                "pose model returned {} outputs, expected at least 2",
                outputs.len()
            ));
        }

        let landmarks: Vec<f32> = outputs[0].try_extract_array::<f32>()?.iter().copied().collect();
        let score = outputs[1]
            .try_extract_array::<f32>()?
            .iter()
            .next()
            .copied()
            .unwrap_or(0.0);

        Ok((landmarks, score, letterbox))
    }
}

impl PoseDetector for OrtPoseDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<PoseLandmarks>, DetectorError> {
        let (flat, score, letterbox) = self.infer(frame)?;
        if !self.gate.accept(score) {
            log::debug!("pose score {score:.2} below {:.2}", self.gate.threshold());
            return Ok(None);
        }
        let landmarks = decode_pose(&flat, &letterbox)?;
        Ok(Some(PoseLandmarks::new(landmarks)?))
    }
}

/// Converts raw model rows into normalized landmarks, keeping the 33 body points.
pub(super) fn decode_pose(flat: &[f32], letterbox: &LetterboxInfo) -> Result<Vec<Landmark>, TopologyError> {
    let available = flat.len() / VALUES_PER_LANDMARK;
    if available < PoseIndex::COUNT {
        return Err(TopologyError {
            kind: LandmarkKind::Pose,
            expected: PoseIndex::COUNT,
            actual: available,
        });
    }

    Ok(flat
        .chunks_exact(VALUES_PER_LANDMARK)
        .take(PoseIndex::COUNT)
        .map(|row| {
            let (x, y) = letterbox.normalize(row[0], row[1]);
            Landmark::new(x, y, row[2] / POSE_INPUT_SIZE as f32, sigmoid(row[3]))
        })
        .collect())
}
