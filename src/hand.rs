use crate::{geometry_utils::centroid, Point2D};

/// Hand landmark indices (MediaPipe hand landmark model convention)
pub mod landmark_index {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_TIP: usize = 20;
}

pub const LANDMARK_COUNT: usize = 21;

/// A single landmark, normalised to the frame: x and y in [0;1],
/// z is depth relative to the wrist
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// The full set of 21 landmarks for one detected hand in one frame
#[derive(Clone, Debug)]
pub struct HandObservation {
    landmarks: [Landmark; LANDMARK_COUNT],
    pub confidence: f32,
    pub handedness: String,
}

impl HandObservation {
    /// Build an observation from a provider landmark list. Anything other
    /// than exactly 21 points is rejected; the caller should treat such a
    /// frame as "no hand observed" rather than default missing points to
    /// the origin.
    pub fn from_landmarks(
        landmarks: Vec<Landmark>,
        confidence: f32,
        handedness: String,
    ) -> Option<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks.try_into().ok()?;
        Some(HandObservation {
            landmarks,
            confidence,
            handedness,
        })
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// One landmark converted to pixel coordinates for the given frame size
    pub fn pixel_position(&self, index: usize, frame_width: u32, frame_height: u32) -> Point2D {
        let lm = &self.landmarks[index];
        (lm.x * frame_width as f32, lm.y * frame_height as f32)
    }

    /// Centroid of wrist, index tip and middle tip in pixel space; this is
    /// the reference point used for cursor movement
    pub fn palm_centroid(&self, frame_width: u32, frame_height: u32) -> Point2D {
        let reference = [
            landmark_index::WRIST,
            landmark_index::INDEX_FINGER_TIP,
            landmark_index::MIDDLE_FINGER_TIP,
        ]
        .map(|i| self.pixel_position(i, frame_width, frame_height));
        centroid(&reference).unwrap_or((0., 0.))
    }

    /// All landmarks in pixel coordinates
    pub fn pixel_positions(&self, frame_width: u32, frame_height: u32) -> Vec<Point2D> {
        self.landmarks
            .iter()
            .map(|lm| (lm.x * frame_width as f32, lm.y * frame_height as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_hand(x: f32, y: f32) -> HandObservation {
        let lm = Landmark { x, y, z: 0. };
        HandObservation::from_landmarks(vec![lm; LANDMARK_COUNT], 0.9, String::from("Right"))
            .unwrap()
    }

    #[test]
    fn test_rejects_incomplete_landmark_sets() {
        let lm = Landmark::default();
        assert!(HandObservation::from_landmarks(vec![lm; 20], 0.9, String::new()).is_none());
        assert!(HandObservation::from_landmarks(Vec::new(), 0.9, String::new()).is_none());
        assert!(HandObservation::from_landmarks(vec![lm; 22], 0.9, String::new()).is_none());
    }

    #[test]
    fn test_pixel_conversion() {
        let hand = uniform_hand(0.25, 0.5);
        assert_eq!(
            hand.pixel_position(landmark_index::WRIST, 640, 480),
            (160., 240.)
        );
    }

    #[test]
    fn test_palm_centroid_uniform_hand() {
        // All 21 points at the frame centre, so the centroid is too
        let hand = uniform_hand(0.5, 0.5);
        assert_eq!(hand.palm_centroid(640, 480), (320., 240.));
    }
}
