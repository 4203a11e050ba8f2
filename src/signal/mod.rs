//! Movement scoring pipeline
//!
//! raw frame -> extractor (`frame` / `landmarks`) -> `smoother` -> normalized
//! score. The dead-zone clamp in `sensitivity` is applied later, once per
//! sampling tick, by the game.

pub mod frame;
pub mod landmarks;
pub mod scorer;
pub mod sensitivity;
pub mod smoother;

pub use frame::{PixelFrame, Rgba, frame_delta};
pub use landmarks::{CORE_LANDMARKS, Landmark, PoseDelta, PoseFrame, pose_delta};
pub use scorer::{FrameInput, MovementScorer, SignalSource};
pub use sensitivity::{Sensitivity, SensitivityLabel, clamp_to_dead_zone};
pub use smoother::{ExponentialSmoother, Smoother, SmoothingStrategy, WindowSmoother};
