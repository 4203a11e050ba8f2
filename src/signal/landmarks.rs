//! Body landmark differencing
//!
//! Landmarks follow the MediaPipe Pose 33-point scheme with normalized (0-1)
//! image coordinates. Only torso points are scored; wrists and ankles jitter
//! too much to judge whether a player is standing still.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// Number of landmarks in a full pose
pub const POSE_LANDMARK_COUNT: usize = 33;
/// Floats per landmark in a flat buffer
pub const LANDMARK_STRIDE: usize = 4;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Points that are scored for movement
pub const CORE_LANDMARKS: [usize; 5] = [NOSE, LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

/// Landmarks below this visibility (in either frame) are ignored
pub const MIN_VISIBILITY: f32 = 0.3;
/// Per-point displacement below this is treated as tracker noise
pub const NOISE_FLOOR: f32 = 0.025;
/// Smoothed displacement treated as full movement
pub const LANDMARK_FULL_SCALE: f32 = 0.02;

/// A single pose landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized image position
    pub pos: Vec2,
    /// Relative depth (unused for scoring)
    #[serde(default)]
    pub z: f32,
    /// Detector confidence; absent means fully visible
    #[serde(default)]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            z: 0.0,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    /// Finite position with a confident detection
    pub fn is_visible(&self) -> bool {
        self.pos.is_finite() && self.visibility.unwrap_or(1.0) >= MIN_VISIBILITY
    }
}

/// One detector result: landmarks indexed by the pose scheme
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Parse a flat `[x, y, z, visibility]` per landmark buffer
    pub fn from_flat(data: &[f32]) -> Result<Self, SignalError> {
        if data.len() % LANDMARK_STRIDE != 0 {
            return Err(SignalError::TruncatedLandmarks { len: data.len() });
        }
        let landmarks = data
            .chunks_exact(LANDMARK_STRIDE)
            .map(|c| Landmark {
                pos: Vec2::new(c[0], c[1]),
                z: c[2],
                visibility: Some(c[3]),
            })
            .collect();
        Ok(Self { landmarks })
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

/// Result of comparing two pose frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseDelta {
    /// Mean noise-filtered displacement over the surviving core points
    Moved(f32),
    /// No core point was visible in both frames
    NothingTracked,
}

/// Compare the core landmarks of two consecutive pose frames
pub fn pose_delta(prev: &PoseFrame, curr: &PoseFrame) -> PoseDelta {
    let mut total = 0.0f32;
    let mut count = 0u32;

    for &idx in &CORE_LANDMARKS {
        let (Some(a), Some(b)) = (prev.get(idx), curr.get(idx)) else {
            continue;
        };
        if !a.is_visible() || !b.is_visible() {
            continue;
        }

        let dist = a.pos.distance(b.pos);
        total += if dist < NOISE_FLOOR { 0.0 } else { dist };
        count += 1;
    }

    if count == 0 {
        PoseDelta::NothingTracked
    } else {
        PoseDelta::Moved(total / count as f32)
    }
}
