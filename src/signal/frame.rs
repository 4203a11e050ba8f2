//! Whole-frame pixel differencing
//!
//! Frames arrive as RGBA8 buffers already mirrored for the selfie view by the
//! capture side. Only every `PIXEL_STRIDE`-th pixel is compared.

use bytemuck::{Pod, Zeroable};

use crate::error::SignalError;

/// Compare every 4th pixel
pub const PIXEL_STRIDE: usize = 4;
/// Mean channel difference treated as full movement
pub const PIXEL_FULL_SCALE: f32 = 20.0;

/// One RGBA8 pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// An owned RGBA8 camera frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelFrame {
    /// Wrap a raw RGBA buffer, checking it matches the declared size
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, SignalError> {
        let actual = bytemuck::try_cast_slice::<u8, Rgba>(&data)
            .map_err(|_| SignalError::UnalignedBuffer { len: data.len() })?
            .len();
        let expected = width as usize * height as usize;
        if actual != expected {
            return Err(SignalError::SizeMismatch {
                width,
                height,
                expected,
                actual,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one color
    pub fn solid(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = vec![color; width as usize * height as usize];
        Self {
            width,
            height,
            data: bytemuck::cast_slice(&pixels).to_vec(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        // Length was validated in the constructors
        bytemuck::cast_slice(&self.data)
    }
}

/// Mean absolute RGB difference between two frames over sampled pixels.
///
/// Alpha is ignored. Returns 0 for empty frames.
pub fn frame_delta(prev: &PixelFrame, curr: &PixelFrame) -> Result<f32, SignalError> {
    if prev.width != curr.width || prev.height != curr.height {
        return Err(SignalError::ResolutionChanged {
            width: curr.width,
            height: curr.height,
            prev_width: prev.width,
            prev_height: prev.height,
        });
    }

    let mut total = 0.0f32;
    let mut sampled = 0usize;
    for (a, b) in prev
        .pixels()
        .iter()
        .zip(curr.pixels())
        .step_by(PIXEL_STRIDE)
    {
        let dr = a.r.abs_diff(b.r) as f32;
        let dg = a.g.abs_diff(b.g) as f32;
        let db = a.b.abs_diff(b.b) as f32;
        total += (dr + dg + db) / 3.0;
        sampled += 1;
    }

    Ok(if sampled > 0 {
        total / sampled as f32
    } else {
        0.0
    })
}
