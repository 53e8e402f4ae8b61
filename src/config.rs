use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::Rgb;

pub const CONFIG_ENV: &str = "GLOW_SKELETON_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "glow-skeleton.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub glow: GlowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Frame loop iterations per second
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_target_fps() -> u32 { 30 }
fn default_title() -> String { "Animated Skeleton".to_string() }

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            target_fps: default_target_fps(),
            title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StyleConfig {
    #[serde(default = "default_glow_color")]
    pub glow_color: Rgb,
    #[serde(default = "default_background")]
    pub background: Rgb,
}

fn default_glow_color() -> Rgb { Rgb::GLOW }
fn default_background() -> Rgb { Rgb::BLACK }

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            glow_color: default_glow_color(),
            background: default_background(),
        }
    }
}

/// Halo layering. Alphas are on a 0-255 scale.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GlowConfig {
    #[serde(default = "default_point_layers")]
    pub point_layers: u32,
    #[serde(default = "default_line_layers")]
    pub line_layers: u32,
    /// Radius / thickness growth per layer in pixels
    #[serde(default = "default_step")]
    pub step: i32,
    #[serde(default = "default_point_alpha")]
    pub point_alpha: u8,
    #[serde(default = "default_point_alpha_decay")]
    pub point_alpha_decay: u8,
    #[serde(default = "default_line_alpha")]
    pub line_alpha: u8,
    #[serde(default = "default_line_alpha_decay")]
    pub line_alpha_decay: u8,
    #[serde(default = "default_min_alpha")]
    pub min_alpha: u8,
}

fn default_point_layers() -> u32 { 3 }
fn default_line_layers() -> u32 { 2 }
fn default_step() -> i32 { 2 }
fn default_point_alpha() -> u8 { 100 }
fn default_point_alpha_decay() -> u8 { 30 }
fn default_line_alpha() -> u8 { 50 }
fn default_line_alpha_decay() -> u8 { 20 }
fn default_min_alpha() -> u8 { 10 }

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            point_layers: default_point_layers(),
            line_layers: default_line_layers(),
            step: default_step(),
            point_alpha: default_point_alpha(),
            point_alpha_decay: default_point_alpha_decay(),
            line_alpha: default_line_alpha(),
            line_alpha_decay: default_line_alpha_decay(),
            min_alpha: default_min_alpha(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    #[serde(default)]
    pub index: u32,
    /// Flip frames horizontally before detection
    #[serde(default = "default_mirror")]
    pub mirror: bool,
}

fn default_mirror() -> bool { true }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            mirror: default_mirror(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "default_pose_model_path")]
    pub pose_model_path: PathBuf,
    #[serde(default = "default_pose_model_url")]
    pub pose_model_url: Option<String>,
    #[serde(default = "default_face_model_path")]
    pub face_model_path: PathBuf,
    #[serde(default)]
    pub face_model_url: Option<String>,
}

const POSE_MODEL_FILENAME: &str = "pose_estimation_mediapipe_2023mar.onnx";
const POSE_MODEL_URL: &str = "https://github.com/opencv/opencv_zoo/raw/main/models/pose_estimation_mediapipe/pose_estimation_mediapipe_2023mar.onnx";
const FACE_MODEL_FILENAME: &str = "face_landmark.onnx";

fn default_pose_model_path() -> PathBuf { PathBuf::from("models").join(POSE_MODEL_FILENAME) }
fn default_pose_model_url() -> Option<String> { Some(POSE_MODEL_URL.to_string()) }
fn default_face_model_path() -> PathBuf { PathBuf::from("models").join(FACE_MODEL_FILENAME) }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_model_path: default_pose_model_path(),
            pose_model_url: default_pose_model_url(),
            face_model_path: default_face_model_path(),
            face_model_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    #[serde(default = "default_confidence")]
    pub min_detection_confidence: f32,
    #[serde(default = "default_confidence")]
    pub min_tracking_confidence: f32,
    /// Keep the iris landmarks the refined face model emits
    #[serde(default = "default_refine")]
    pub refine_face_landmarks: bool,
}

fn default_confidence() -> f32 { 0.5 }
fn default_refine() -> bool { true }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: default_confidence(),
            min_tracking_confidence: default_confidence(),
            refine_face_landmarks: default_refine(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Path from `GLOW_SKELETON_CONFIG`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err:#}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_configuration() {
        let config = AppConfig::default();
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.canvas.target_fps, 30);
        assert_eq!(config.style.glow_color, Rgb(200, 255, 250));
        assert_eq!(config.style.background, Rgb(0, 0, 0));
        assert_eq!(config.glow.point_layers, 3);
        assert_eq!(config.glow.step, 2);
        assert!(config.camera.mirror);
        assert_eq!(config.detector.min_detection_confidence, 0.5);
        assert!(config.detector.refine_face_landmarks);
        assert!(config.models.face_model_url.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let config = AppConfig::parse(
            r#"
            [canvas]
            width = 640
            target_fps = 60

            [style]
            glow_color = [255, 0, 128]

            [glow]
            point_layers = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.canvas.target_fps, 60);
        assert_eq!(config.style.glow_color, Rgb(255, 0, 128));
        assert_eq!(config.glow.point_layers, 2);
        assert_eq!(config.glow.line_layers, 2);
    }

    #[test]
    fn parse_rejects_bad_types() {
        assert!(AppConfig::parse("[canvas]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load_or_default("definitely/not/here.toml");
        assert_eq!(config.canvas.width, 800);
    }
}
