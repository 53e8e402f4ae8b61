use anyhow::{Result, anyhow};
use rayon::prelude::*;
use yuv::{
    YuvBiPlanarImage, YuvConversionMode, YuvPackedImage, YuvRange, YuvStandardMatrix,
    yuv_nv12_to_rgba, yuyv422_to_rgba,
};
use zune_jpeg::{
    JpegDecoder,
    zune_core::{bytestream::ZCursor, colorspace::ColorSpace, options::DecoderOptions},
};

use crate::types::Frame;

/// Pixel layouts a camera may deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Nv12,
    Yuyv,
    Mjpeg,
    Rgb,
    Bgr,
    Gray,
}

#[cfg(feature = "camera-nokhwa")]
impl From<nokhwa::utils::FrameFormat> for SourceFormat {
    fn from(format: nokhwa::utils::FrameFormat) -> Self {
        use nokhwa::utils::FrameFormat;
        match format {
            FrameFormat::NV12 => SourceFormat::Nv12,
            FrameFormat::YUYV => SourceFormat::Yuyv,
            FrameFormat::MJPEG => SourceFormat::Mjpeg,
            FrameFormat::RAWRGB => SourceFormat::Rgb,
            FrameFormat::RAWBGR => SourceFormat::Bgr,
            FrameFormat::GRAY => SourceFormat::Gray,
        }
    }
}

/// Converts a raw camera buffer into an RGBA [`Frame`].
#[cfg(feature = "camera-nokhwa")]
pub fn convert_camera_frame(buffer: &nokhwa::Buffer) -> Result<Frame> {
    let resolution = buffer.resolution();
    decode(
        buffer.source_frame_format().into(),
        buffer.buffer(),
        resolution.width_x,
        resolution.height_y,
    )
}

impl SourceFormat {
    /// Bytes needed for `pixels` pixels, or `None` for compressed input.
    fn packed_len(self, pixels: usize) -> Option<usize> {
        match self {
            SourceFormat::Nv12 => Some(pixels + pixels / 2),
            SourceFormat::Yuyv => Some(pixels * 2),
            SourceFormat::Rgb | SourceFormat::Bgr => Some(pixels * 3),
            SourceFormat::Gray => Some(pixels),
            SourceFormat::Mjpeg => None,
        }
    }
}

pub fn decode(format: SourceFormat, data: &[u8], width: u32, height: u32) -> Result<Frame> {
    let pixels = width as usize * height as usize;
    let data = match format.packed_len(pixels) {
        Some(needed) if data.len() < needed => {
            return Err(anyhow!(
                "{format:?} buffer too small: got {}, expected {needed}",
                data.len()
            ));
        }
        Some(needed) => &data[..needed],
        None => data,
    };

    let rgba = match format {
        SourceFormat::Nv12 => nv12_to_rgba(data, width, height)?,
        SourceFormat::Yuyv => yuyv_to_rgba(data, width, height)?,
        SourceFormat::Mjpeg => mjpeg_to_rgba(data, pixels)?,
        SourceFormat::Rgb | SourceFormat::Bgr | SourceFormat::Gray => {
            widen_to_rgba(format, data, pixels)
        }
    };
    Ok(Frame::new(rgba, width, height))
}

fn nv12_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let (y_plane, uv_plane) = data.split_at(width as usize * height as usize);
    let image = YuvBiPlanarImage {
        y_plane,
        y_stride: width,
        uv_plane,
        uv_stride: width,
        width,
        height,
    };
    let mut rgba = vec![0u8; y_plane.len() * 4];
    yuv_nv12_to_rgba(
        &image,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .map_err(|err| anyhow!("NV12 conversion failed: {err:?}"))?;
    Ok(rgba)
}

fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let packed = YuvPackedImage {
        yuy: data,
        yuy_stride: width * 2,
        width,
        height,
    };
    let mut rgba = vec![0u8; data.len() * 2];
    yuyv422_to_rgba(
        &packed,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
    )
    .map_err(|err| anyhow!("YUYV conversion failed: {err:?}"))?;
    Ok(rgba)
}

fn mjpeg_to_rgba(data: &[u8], pixels: usize) -> Result<Vec<u8>> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGBA);
    let mut decoder = JpegDecoder::new_with_options(ZCursor::new(data), options);
    let mut rgba = decoder
        .decode()
        .map_err(|err| anyhow!("MJPEG decode failed: {err:?}"))?;
    if rgba.len() < pixels * 4 {
        return Err(anyhow!(
            "MJPEG frame smaller than reported resolution: {} bytes for {pixels} pixels",
            rgba.len()
        ));
    }
    rgba.truncate(pixels * 4);
    Ok(rgba)
}

/// Expands 1- or 3-byte pixels to opaque RGBA, reordering BGR input.
fn widen_to_rgba(format: SourceFormat, data: &[u8], pixels: usize) -> Vec<u8> {
    let channels = if format == SourceFormat::Gray { 1 } else { 3 };
    let mut rgba = vec![255u8; pixels * 4];
    rgba.par_chunks_exact_mut(4)
        .zip(data.par_chunks_exact(channels))
        .for_each(|(dst, src)| match (format, src) {
            (SourceFormat::Bgr, &[b, g, r]) => dst[..3].copy_from_slice(&[r, g, b]),
            (_, &[r, g, b]) => dst[..3].copy_from_slice(&[r, g, b]),
            (_, &[v]) => dst[..3].fill(v),
            _ => {}
        });
    rgba
}
