//! Horizontal mirroring of camera frames.
//!
//! Frames are flipped before they reach the detectors, so every landmark is
//! already expressed in the mirrored image the user expects to see and the
//! projector needs no coordinate flip of its own.

use rayon::prelude::*;

use crate::types::Frame;

/// Flips an RGBA frame left-to-right in place.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    if width < 2 {
        return;
    }
    let stride = width * 4;
    frame.rgba.par_chunks_exact_mut(stride).for_each(|row| {
        let (mut left, mut right) = (0usize, width - 1);
        while left < right {
            for c in 0..4 {
                row.swap(left * 4 + c, right * 4 + c);
            }
            left += 1;
            right -= 1;
        }
    });
}
