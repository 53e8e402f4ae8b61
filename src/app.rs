use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::AppConfig;
use crate::error::DetectorError;
use crate::pipeline::{FaceDetector, FrameSource, PoseDetector, SkeletonComposer, mirror_horizontal};
use crate::render::Canvas;
use crate::surface::Surface;
use crate::types::{Detections, Frame};

/// Sleeps away whatever is left of a fixed tick.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    last_tick: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / target_fps.max(1),
            last_tick: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until one interval has passed since the previous call.
    pub fn wait(&mut self) {
        let elapsed = self.last_tick.elapsed();
        if elapsed < self.interval {
            thread::sleep(self.interval - elapsed);
        }
        self.last_tick = Instant::now();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub ticks: u64,
    pub frames_rendered: u64,
    pub acquisition_failures: u64,
}

/// Everything one run of the overlay needs. Dropping it releases the camera
/// and closes the window.
pub struct App<S, C, P, F> {
    surface: S,
    source: C,
    pose: P,
    face: F,
    canvas: Canvas,
    composer: SkeletonComposer,
    pacer: FramePacer,
    mirror: bool,
}

impl<S, C, P, F> App<S, C, P, F>
where
    S: Surface,
    C: FrameSource,
    P: PoseDetector,
    F: FaceDetector,
{
    pub fn new(config: &AppConfig, surface: S, source: C, pose: P, face: F) -> Self {
        Self {
            surface,
            source,
            pose,
            face,
            canvas: Canvas::new(config.canvas.width, config.canvas.height, config.glow),
            composer: SkeletonComposer::new(config.style.clone()),
            pacer: FramePacer::new(config.canvas.target_fps),
            mirror: config.camera.mirror,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Runs until the surface asks to close. Only a landmark topology mismatch
    /// ends the loop with an error.
    pub fn run(&mut self) -> Result<FrameStats> {
        let mut stats = FrameStats::default();
        log::info!(
            "frame loop started: {}x{} every {:?}",
            self.canvas.width(),
            self.canvas.height(),
            self.pacer.interval()
        );

        while !self.surface.should_close() {
            stats.ticks += 1;
            match self.source.read() {
                Ok(mut frame) => {
                    if self.mirror {
                        mirror_horizontal(&mut frame);
                    }
                    let detections = self.detect(&frame)?;
                    self.composer.render_skeleton(
                        &mut self.canvas,
                        detections.pose.as_ref(),
                        detections.face.as_ref(),
                    );
                    self.surface.present(&self.canvas)?;
                    stats.frames_rendered += 1;
                }
                Err(err) => {
                    stats.acquisition_failures += 1;
                    log::warn!("skipping frame: {err:#}");
                }
            }
            self.pacer.wait();
        }

        log::info!(
            "frame loop stopped after {} ticks ({} rendered, {} acquisition failures)",
            stats.ticks,
            stats.frames_rendered,
            stats.acquisition_failures
        );
        Ok(stats)
    }

    fn detect(&mut self, frame: &Frame) -> Result<Detections> {
        let pose = recover(self.pose.detect(frame))?;
        // Face landmarks are only drawn with a body, so skip the face pass without one.
        let face = if pose.is_some() {
            recover(self.face.detect(frame))?
        } else {
            None
        };
        log::debug!(
            "detections: pose {}, face {}",
            pose.is_some(),
            face.is_some()
        );
        Ok(Detections { pose, face })
    }
}

fn recover<T>(result: Result<Option<T>, DetectorError>) -> Result<Option<T>> {
    match result {
        Ok(found) => Ok(found),
        Err(err) if err.is_fatal() => {
            log::error!("{err}");
            Err(err.into())
        }
        Err(err) => {
            log::warn!("{err}");
            Ok(None)
        }
    }
}
