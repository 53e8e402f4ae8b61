use anyhow::{Context, Result, anyhow};
use nokhwa::{
    Camera as NokhwaCamera,
    pixel_format::RgbFormat,
    query,
    utils::{
        ApiBackend, CameraIndex, CameraInfo, FrameFormat, RequestedFormat, RequestedFormatType,
    },
};

use super::FrameSource;
use super::rgba_converter;
use crate::types::Frame;

// Prefer pixel formats that are widely supported on macOS (the built-in cameras
// often reject YUYV even though Nokhwa reports it).
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
    FrameFormat::GRAY,
    FrameFormat::YUYV,
    FrameFormat::NV12,
    FrameFormat::MJPEG,
];

fn requested_formats() -> [RequestedFormat<'static>; 3] {
    [
        // Live rendering paces at 30 FPS; ask for the fastest mode first.
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

#[derive(Clone, Debug)]
pub struct CameraDevice {
    pub index: CameraIndex,
    pub label: String,
}

pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    let cameras = query(ApiBackend::Auto)?;
    Ok(cameras
        .into_iter()
        .map(|info| CameraDevice {
            index: info.index().clone(),
            label: format_camera_label(&info),
        })
        .collect())
}

fn format_camera_label(info: &CameraInfo) -> String {
    format!("{} ({})", info.human_name(), info.index())
}

/// Blocking webcam handle. Each [`FrameSource::read`] waits for the next frame.
pub struct Camera {
    inner: Option<NokhwaCamera>,
}

impl Camera {
    pub fn open(index: u32) -> Result<Self> {
        let index = CameraIndex::Index(index);
        let mut last_err: Option<anyhow::Error> = None;

        for requested in requested_formats() {
            match NokhwaCamera::new(index.clone(), requested) {
                Ok(mut camera) => match camera.open_stream() {
                    Ok(()) => {
                        log::info!(
                            "camera {index} streaming {:?}",
                            camera.camera_format()
                        );
                        return Ok(Self {
                            inner: Some(camera),
                        });
                    }
                    Err(err) => last_err = Some(err.into()),
                },
                Err(err) => last_err = Some(err.into()),
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("failed to open camera with any supported format")))
    }

    /// Stops the stream. Further reads fail.
    pub fn release(&mut self) {
        if let Some(mut camera) = self.inner.take() {
            if let Err(err) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {err:?}");
            }
        }
    }
}

impl FrameSource for Camera {
    fn read(&mut self) -> Result<Frame> {
        let camera = self
            .inner
            .as_mut()
            .ok_or_else(|| anyhow!("camera already released"))?;
        let buffer = camera.frame().context("camera frame read failed")?;
        rgba_converter::convert_camera_frame(&buffer).context("failed to decode camera frame")
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.release();
    }
}
