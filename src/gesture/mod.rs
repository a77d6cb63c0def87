//! Gesture module: hand landmarks in, finger counts out
//!
//! - `landmarks`: keypoint types and the tracker line format
//! - `classifier`: extended-finger counting
//! - `source`: frame producers (the tracker process)
//! - `frame_loop`: the per-frame classify-and-submit loop

mod classifier;
mod frame_loop;
mod landmarks;
mod source;

pub use classifier::{FingerState, GestureReading, HandPoseClassifier};
pub use frame_loop::{run_frames, FrameLoop, FrameLoopError, FrameLoopExit};
pub use landmarks::{Handedness, HandLandmarks, LandmarkFrame, Point, FINGER_TIPS, LANDMARK_COUNT};
pub use source::{JsonLinesSource, LandmarkSource, SourceError, TrackerHandle, TrackerProcess};
