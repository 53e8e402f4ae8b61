pub mod common;
mod face;
mod pose;

pub use face::{FACE_INPUT_SIZE, OrtFaceDetector};
pub use pose::{OrtPoseDetector, POSE_INPUT_SIZE};

use anyhow::Result;

use crate::config::{AppConfig, DetectorConfig, ModelConfig};
use crate::error::DetectorError;
use crate::model_download::{ModelDownloadEvent, ModelKind, ensure_model_ready};
use crate::types::{FaceLandmarks, Frame, PoseLandmarks};

/// Single-subject body pose estimator.
pub trait PoseDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<PoseLandmarks>, DetectorError>;
}

/// Single-subject face mesh estimator. Only the first face is reported.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceLandmarks>, DetectorError>;
}

/// Face detection turned off, for example when no face model is available.
pub struct NoFaceDetector;

impl FaceDetector for NoFaceDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Option<FaceLandmarks>, DetectorError> {
        Ok(None)
    }
}

impl<T: FaceDetector + ?Sized> FaceDetector for Box<T> {
    fn detect(&mut self, frame: &Frame) -> Result<Option<FaceLandmarks>, DetectorError> {
        (**self).detect(frame)
    }
}

/// Fetches the pose model if needed and opens it.
pub fn load_pose_detector(config: &AppConfig) -> Result<OrtPoseDetector> {
    let models = &config.models;
    ensure_model_ready(
        ModelKind::PoseLandmarker,
        &models.pose_model_path,
        models.pose_model_url.as_deref(),
        log_download,
    )?;
    OrtPoseDetector::new(&models.pose_model_path, &config.detector)
}

/// Face tracking is optional: without a usable model only the body is drawn.
pub fn load_face_detector(config: &AppConfig) -> Box<dyn FaceDetector> {
    let models = &config.models;
    if let Some(hint) = missing_face_model_hint(models) {
        log::warn!("face detection disabled: {hint}");
        return Box::new(NoFaceDetector);
    }
    let loaded = ensure_model_ready(
        ModelKind::FaceMesh,
        &models.face_model_path,
        models.face_model_url.as_deref(),
        log_download,
    )
    .and_then(|()| OrtFaceDetector::new(&models.face_model_path, &config.detector));

    match loaded {
        Ok(detector) => Box::new(detector),
        Err(err) => {
            log::warn!("face detection disabled: {err:#}");
            Box::new(NoFaceDetector)
        }
    }
}

/// No face mesh model ships by default; say where one has to go.
pub fn missing_face_model_hint(models: &ModelConfig) -> Option<String> {
    if models.face_model_url.is_some() || models.face_model_path.exists() {
        return None;
    }
    Some(format!(
        "no face mesh model at {}. Put a MediaPipe face landmark ONNX file \
         (192x192 input) there or set `models.face_model_url` in {}",
        models.face_model_path.display(),
        AppConfig::default_path().display()
    ))
}

fn log_download(event: ModelDownloadEvent) {
    match event {
        ModelDownloadEvent::AlreadyPresent { model } => {
            log::info!("{} model already present", model.label());
        }
        ModelDownloadEvent::Finished { model } => log::info!("{} model ready", model.label()),
        ModelDownloadEvent::Started { .. } | ModelDownloadEvent::Progress { .. } => {}
    }
}

/// Presence threshold that relaxes to the tracking confidence while a subject
/// was found on the previous frame.
#[derive(Clone, Debug)]
pub struct ConfidenceGate {
    detection: f32,
    tracking: f32,
    tracking_active: bool,
}

impl ConfidenceGate {
    pub fn new(cfg: &DetectorConfig) -> Self {
        Self {
            detection: cfg.min_detection_confidence,
            tracking: cfg.min_tracking_confidence,
            tracking_active: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        if self.tracking_active {
            self.tracking
        } else {
            self.detection
        }
    }

    /// Records the presence score of this frame and reports whether it passes.
    pub fn accept(&mut self, score: f32) -> bool {
        let passed = score >= self.threshold();
        self.tracking_active = passed;
        passed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_switches_to_tracking_threshold() {
        let cfg = DetectorConfig {
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.3,
            refine_face_landmarks: true,
        };
        let mut gate = ConfidenceGate::new(&cfg);
        assert!(!gate.accept(0.5));
        assert!(gate.accept(0.8));
        assert_eq!(gate.threshold(), 0.3);
        assert!(gate.accept(0.5));
        assert!(!gate.accept(0.2));
        assert_eq!(gate.threshold(), 0.7);
    }

    #[test]
    fn missing_face_model_falls_back_to_disabled() {
        let mut config = AppConfig::default();
        config.models.face_model_path = "no/such/face_landmark.onnx".into();
        config.models.face_model_url = None;
        let mut detector = load_face_detector(&config);
        let frame = Frame::new(vec![0; 4], 1, 1);
        assert!(detector.detect(&frame).unwrap().is_none());
    }

    #[test]
    fn default_config_explains_missing_face_model() {
        let mut models = ModelConfig::default();
        models.face_model_path = "no/such/face_landmark.onnx".into();
        let hint = missing_face_model_hint(&models).unwrap();
        assert!(hint.contains("no/such/face_landmark.onnx"));
        assert!(hint.contains("models.face_model_url"));

        models.face_model_url = Some("https://example.invalid/face.onnx".into());
        assert!(missing_face_model_hint(&models).is_none());
    }

    #[test]
    fn disabled_face_detector_reports_nothing() {
        let frame = Frame::new(vec![0; 4], 1, 1);
        assert!(NoFaceDetector.detect(&frame).unwrap().is_none());
    }
}
