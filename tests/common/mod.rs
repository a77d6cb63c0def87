// Shared fakes and builders for handsignal integration tests

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use handsignal::feedback::Feedback;
use handsignal::gesture::{HandLandmarks, LandmarkFrame, Point, FINGER_TIPS, LANDMARK_COUNT};
use handsignal::link::{ActuatorLink, LinkError};
use handsignal::state::ActuatorState;

pub const COOLDOWN: Duration = Duration::from_secs(2);

/// Link that records every wire byte and can be unplugged
#[derive(Clone, Default)]
pub struct FakeLink {
    writes: Arc<Mutex<Vec<u8>>>,
    unplugged: Arc<Mutex<bool>>,
}

impl FakeLink {
    pub fn writes(&self) -> Vec<u8> {
        self.writes.lock().unwrap().clone()
    }

    pub fn unplug(&self) {
        *self.unplugged.lock().unwrap() = true;
    }

    pub fn replug(&self) {
        *self.unplugged.lock().unwrap() = false;
    }
}

impl ActuatorLink for FakeLink {
    fn send(&mut self, state: ActuatorState) -> Result<(), LinkError> {
        if *self.unplugged.lock().unwrap() {
            return Err(LinkError::Disconnected(io::Error::new(
                io::ErrorKind::NotFound,
                "device disconnected",
            )));
        }
        self.writes.lock().unwrap().push(state.wire_byte());
        Ok(())
    }
}

/// Feedback that remembers what it was asked to say
#[derive(Clone, Default)]
pub struct FakeFeedback {
    phrases: Arc<Mutex<Vec<String>>>,
}

impl FakeFeedback {
    pub fn phrases(&self) -> Vec<String> {
        self.phrases.lock().unwrap().clone()
    }
}

impl Feedback for FakeFeedback {
    fn speak(&self, phrase: &str) {
        self.phrases.lock().unwrap().push(phrase.to_string());
    }
}

/// An upright right hand showing `count` fingers.
///
/// Fingers are raised index first; the thumb only joins for five.
pub fn hand_showing(count: u8) -> HandLandmarks {
    let mut points = vec![Point::new(0.5, 0.9); LANDMARK_COUNT];

    let thumb_out = count >= 5;
    let thumb_x = if thumb_out { [0.45, 0.40, 0.35, 0.30] } else { [0.45, 0.48, 0.50, 0.52] };
    for (offset, x) in thumb_x.iter().enumerate() {
        points[1 + offset] = Point::new(*x, 0.75);
    }

    for (digit, &tip) in FINGER_TIPS.iter().enumerate().skip(1) {
        let up = (digit as u8) <= count.min(4);
        let x = 0.45 + 0.05 * digit as f32;
        points[tip - 3] = Point::new(x, 0.70);
        points[tip - 2] = Point::new(x, 0.60);
        points[tip - 1] = Point::new(x, if up { 0.50 } else { 0.62 });
        points[tip] = Point::new(x, if up { 0.40 } else { 0.66 });
    }

    HandLandmarks::new(points)
}

/// One tracker output line; negative counts produce an empty frame
pub fn frame_line(count: i8) -> String {
    let frame = LandmarkFrame {
        hands: if count < 0 {
            Vec::new()
        } else {
            vec![hand_showing(count as u8)]
        },
    };
    serde_json::to_string(&frame).unwrap()
}
