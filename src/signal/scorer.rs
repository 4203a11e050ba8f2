//! Frame input to normalized movement score

use serde::{Deserialize, Serialize};

use super::frame::{PIXEL_FULL_SCALE, PixelFrame, frame_delta};
use super::landmarks::{LANDMARK_FULL_SCALE, PoseDelta, PoseFrame, pose_delta};
use super::smoother::{Smoother, SmoothingStrategy};
use crate::error::SignalError;

/// Which raw signal the camera pipeline delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// Pose landmarks from a body tracker
    #[default]
    Landmarks,
    /// Raw RGBA frames, scored by frame differencing
    Pixels,
}

impl SignalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Landmarks => "landmarks",
            SignalSource::Pixels => "pixels",
        }
    }

    /// Smoothed raw value that maps to a score of 1.0
    pub fn full_scale(&self) -> f32 {
        match self {
            SignalSource::Landmarks => LANDMARK_FULL_SCALE,
            SignalSource::Pixels => PIXEL_FULL_SCALE,
        }
    }
}

/// One delivery from the camera pipeline
#[derive(Debug, Clone)]
pub enum FrameInput {
    Pose(PoseFrame),
    Pixels(PixelFrame),
    /// The pipeline produced nothing usable this frame
    Missing,
}

impl FrameInput {
    fn kind(&self) -> &'static str {
        match self {
            FrameInput::Pose(_) => "landmarks",
            FrameInput::Pixels(_) => "pixels",
            FrameInput::Missing => "missing",
        }
    }
}

/// Per-session movement scorer.
///
/// Holds the previous frame and the smoother carry. Missing frames hold the
/// last score; frames that cannot be scored leave state untouched and return
/// an error so the caller can record a no-movement sample instead.
#[derive(Debug, Clone)]
pub struct MovementScorer {
    source: SignalSource,
    smoother: Smoother,
    prev_pose: Option<PoseFrame>,
    prev_pixels: Option<PixelFrame>,
    score: f32,
}

impl MovementScorer {
    pub fn new(source: SignalSource, smoothing: SmoothingStrategy) -> Self {
        Self {
            source,
            smoother: Smoother::new(smoothing),
            prev_pose: None,
            prev_pixels: None,
            score: 0.0,
        }
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    /// Latest normalized score in [0, 1]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Forget all history; the next frame scores from a cold start
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.prev_pose = None;
        self.prev_pixels = None;
        self.score = 0.0;
    }

    /// Score one frame from the camera pipeline
    pub fn observe(&mut self, input: FrameInput) -> Result<f32, SignalError> {
        match (self.source, input) {
            (_, FrameInput::Missing) => {}
            (SignalSource::Landmarks, FrameInput::Pose(pose)) => self.observe_pose(pose),
            (SignalSource::Pixels, FrameInput::Pixels(frame)) => self.observe_pixels(frame)?,
            (source, other) => {
                return Err(SignalError::UnexpectedInput {
                    expected: source.as_str(),
                    got: other.kind(),
                });
            }
        }
        Ok(self.score)
    }

    /// Record "no movement observed" for a frame that could not be scored
    pub fn observe_no_movement(&mut self) -> f32 {
        let smoothed = self.smoother.update(0.0);
        self.publish(smoothed)
    }

    fn observe_pose(&mut self, pose: PoseFrame) {
        // A detector result without landmarks carries no information
        if pose.is_empty() {
            return;
        }
        if let Some(prev) = self.prev_pose.as_ref() {
            let smoothed = match pose_delta(prev, &pose) {
                PoseDelta::Moved(delta) => self.smoother.update(delta),
                PoseDelta::NothingTracked => self.smoother.force_zero(),
            };
            self.publish(smoothed);
        }
        self.prev_pose = Some(pose);
    }

    fn observe_pixels(&mut self, frame: PixelFrame) -> Result<(), SignalError> {
        let raw = match self.prev_pixels.as_ref() {
            Some(prev) => match frame_delta(prev, &frame) {
                Ok(raw) => raw,
                Err(err) => {
                    // Start over from the new resolution
                    self.prev_pixels = Some(frame);
                    return Err(err);
                }
            },
            None => 0.0,
        };
        let smoothed = self.smoother.update(raw);
        self.publish(smoothed);
        self.prev_pixels = Some(frame);
        Ok(())
    }

    fn publish(&mut self, smoothed: f32) -> f32 {
        self.score = (smoothed / self.source.full_scale()).clamp(0.0, 1.0);
        self.score
    }
}
