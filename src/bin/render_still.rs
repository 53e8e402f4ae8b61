use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use glow_skeleton::config::AppConfig;
use glow_skeleton::pipeline::detector::{load_face_detector, load_pose_detector};
use glow_skeleton::pipeline::{FaceDetector, PoseDetector, SkeletonComposer};
use glow_skeleton::render::Canvas;
use glow_skeleton::types::Frame;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: render-still <input image> [output.png]"))?;
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("skeleton.png"));

    let config = AppConfig::load_or_default(AppConfig::default_path());
    let frame = load_frame(&input)?;

    let mut pose_detector = load_pose_detector(&config)?;
    let mut face_detector = load_face_detector(&config);

    let pose = pose_detector.detect(&frame)?;
    let face = match pose {
        Some(_) => face_detector.detect(&frame)?,
        None => None,
    };
    if pose.is_none() {
        log::warn!("no body found in {}", input.display());
    }

    let mut canvas = Canvas::new(config.canvas.width, config.canvas.height, config.glow);
    let mut composer = SkeletonComposer::new(config.style.clone());
    composer.render_skeleton(&mut canvas, pose.as_ref(), face.as_ref());

    let image = canvas
        .to_image()
        .ok_or_else(|| anyhow!("canvas buffer does not match its size"))?;
    image
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "{} -> {} (pose {}, face {})",
        input.display(),
        output.display(),
        if pose.is_some() { "found" } else { "none" },
        if face.is_some() { "found" } else { "none" }
    );
    Ok(())
}

fn load_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(Frame::new(image.into_raw(), width, height))
}
