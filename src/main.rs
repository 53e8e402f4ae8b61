use anyhow::Result;
use glow_skeleton::config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load_or_default(AppConfig::default_path());

    if let Err(err) = run(&config) {
        log::error!("{err:#}");
        return Err(err);
    }
    Ok(())
}

#[cfg(feature = "camera-nokhwa")]
fn run(config: &AppConfig) -> Result<()> {
    use anyhow::Context;
    use glow_skeleton::app::App;
    use glow_skeleton::pipeline::detector::{load_face_detector, load_pose_detector};
    use glow_skeleton::pipeline::{Camera, available_cameras};
    use glow_skeleton::surface::MinifbSurface;

    match available_cameras() {
        Ok(cameras) if cameras.is_empty() => log::warn!("no cameras found"),
        Ok(cameras) => {
            for camera in &cameras {
                log::info!("camera available: {}", camera.label);
            }
        }
        Err(err) => log::warn!("failed to list cameras: {err:#}"),
    }

    let pose = load_pose_detector(config)?;
    let face = load_face_detector(config);

    let camera = Camera::open(config.camera.index)
        .with_context(|| format!("failed to open camera {}", config.camera.index))?;
    let surface = MinifbSurface::new(&config.canvas).context("failed to open window")?;
    log::info!(
        "window \"{}\" opened at {}x{}",
        config.canvas.title,
        config.canvas.width,
        config.canvas.height
    );

    let mut app = App::new(config, surface, camera, pose, face);
    let stats = app.run()?;
    log::info!("rendered {} of {} ticks", stats.frames_rendered, stats.ticks);
    Ok(())
}

#[cfg(not(feature = "camera-nokhwa"))]
fn run(_config: &AppConfig) -> Result<()> {
    anyhow::bail!("built without the camera-nokhwa feature; use render-still for image files")
}
