use std::path::Path;

use anyhow::{Context, Result, anyhow};
use ort::session::Session;
use ort::value::Tensor;

use super::common::{self, LetterboxInfo, sigmoid};
use super::{ConfidenceGate, FaceDetector};
use crate::config::DetectorConfig;
use crate::error::{DetectorError, LandmarkKind, TopologyError};
use crate::types::{FaceLandmarks, Frame, Landmark};

pub const FACE_INPUT_SIZE: u32 = 192;

/// MediaPipe face mesh model on ONNX Runtime, run on the whole frame.
pub struct OrtFaceDetector {
    session: Session,
    gate: ConfidenceGate,
    refine: bool,
}

impl OrtFaceDetector {
    pub fn new(model_path: &Path, cfg: &DetectorConfig) -> Result<Self> {
        let session = common::load_session(model_path)?;
        log::info!(
            "face mesh model ready: {} (refined landmarks {})",
            model_path.display(),
            if cfg.refine_face_landmarks { "on" } else { "off" }
        );
        Ok(Self {
            session,
            gate: ConfidenceGate::new(cfg),
            refine: cfg.refine_face_landmarks,
        })
    }

    fn infer(&mut self, frame: &Frame) -> Result<(Vec<f32>, f32, LetterboxInfo)> {
        let (input, letterbox) = common::prepare_frame_with_size(frame, FACE_INPUT_SIZE)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run face mesh session")?;

        if outputs.len() < 2 {
            return Err(anyhow!(
                "face model returned {} outputs, expected at least 2",
                outputs.len()
            ));
        }

        let landmarks: Vec<f32> = outputs[0].try_extract_array::<f32>()?.iter().copied().collect();
        let logit = outputs[1]
            .try_extract_array::<f32>()?
            .iter()
            .next()
            .copied()
            .unwrap_or(f32::NEG_INFINITY);

        Ok((landmarks, sigmoid(logit), letterbox))
    }
}

impl FaceDetector for OrtFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceLandmarks>, DetectorError> {
        let (flat, score, letterbox) = self.infer(frame)?;
        if !self.gate.accept(score) {
            log::debug!("face score {score:.2} below {:.2}", self.gate.threshold());
            return Ok(None);
        }
        let landmarks = decode_face(&flat, &letterbox, self.refine)?;
        Ok(Some(FaceLandmarks::new(landmarks)?))
    }
}

/// Converts `(x, y, z)` triples in input pixels to normalized face landmarks.
pub(super) fn decode_face(
    flat: &[f32],
    letterbox: &LetterboxInfo,
    refine: bool,
) -> Result<Vec<Landmark>, TopologyError> {
    let available = flat.len() / 3;
    if available < FaceLandmarks::COUNT {
        return Err(TopologyError {
            kind: LandmarkKind::Face,
            expected: FaceLandmarks::COUNT,
            actual: available,
        });
    }
    let keep = if refine {
        available.min(FaceLandmarks::REFINED_COUNT)
    } else {
        FaceLandmarks::COUNT
    };

    Ok(flat
        .chunks_exact(3)
        .take(keep)
        .map(|p| {
            let (x, y) = letterbox.normalize(p[0], p[1]);
            Landmark::face(x, y, p[2] / FACE_INPUT_SIZE as f32)
        })
        .collect())
}
