//! Hand keypoint types shared by the landmark source and the classifier
//!
//! Points use normalized image coordinates: x grows to the right, y grows
//! downwards, both roughly in `0.0..=1.0`.

use serde::{Deserialize, Serialize};

/// Number of keypoints per detected hand
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices of the five fingertips, thumb first
pub const FINGER_TIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// A 2-D keypoint, serialized as an `[x, y]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Which hand the tracker believes it saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

/// Keypoints of one detected hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub landmarks: Vec<Point>,
    #[serde(default)]
    pub handedness: Option<Handedness>,
}

impl HandLandmarks {
    pub fn new(landmarks: Vec<Point>) -> Self {
        Self {
            landmarks,
            handedness: None,
        }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    /// Has a keypoint for every landmark index
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }
}

/// One tracker frame: every hand detected in it, in tracker order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_deserialization() {
        let json = r#"{"hands":[{"landmarks":[[0.5,0.25],[0.1,0.9]],"handedness":"left"}]}"#;
        let frame: LandmarkFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].landmarks[0], Point::new(0.5, 0.25));
        assert_eq!(frame.hands[0].handedness, Some(Handedness::Left));
        assert!(!frame.hands[0].is_complete());
    }

    #[test]
    fn test_empty_frame() {
        let frame: LandmarkFrame = serde_json::from_str(r#"{"hands":[]}"#).unwrap();
        assert!(frame.hands.is_empty());

        let frame: LandmarkFrame = serde_json::from_str("{}").unwrap();
        assert!(frame.hands.is_empty());
    }
}
