// Pointer-driven stand-in for the hand-landmark model.
// The mouse position becomes the index fingertip and the held button/key
// picks a pose; the pose is laid out as finger landmarks that the gesture
// classifier maps back to the same gesture.

use crate::error::Result;
use crate::frame_loop::LandmarkEstimator;
use crate::gesture::Gesture;
use crate::landmarks::{Finger, HandLandmarks, Landmark};
use crate::types::{FrameBuffer, Point};

/// Fingertip offsets from the index tip, in [`Finger::ALL`] order.
fn tip_offsets(gesture: Gesture) -> Option<[(f32, f32); 5]> {
    let offsets = match gesture {
        Gesture::Point => [(10.0, 10.0), (0.0, 0.0), (60.0, 40.0), (120.0, 40.0), (180.0, 40.0)],
        Gesture::Peace => [(-80.0, 60.0), (0.0, 0.0), (20.0, 0.0), (100.0, 60.0), (160.0, 60.0)],
        Gesture::Palm => [(-80.0, 60.0), (0.0, 0.0), (20.0, 0.0), (40.0, 0.0), (60.0, 0.0)],
        Gesture::ThumbsUp => [(-80.0, -80.0), (0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (150.0, 0.0)],
        Gesture::Pinch => [(10.0, 5.0), (0.0, 0.0), (35.0, 0.0), (70.0, 0.0), (105.0, 0.0)],
        Gesture::Spread => [(-60.0, 60.0), (0.0, 0.0), (60.0, 0.0), (120.0, 0.0), (180.0, 0.0)],
        Gesture::Rock => [(-60.0, 60.0), (0.0, 0.0), (35.0, -10.0), (70.0, -20.0), (105.0, -30.0)],
        Gesture::Open => [(-60.0, 60.0), (0.0, 0.0), (35.0, 0.0), (70.0, 0.0), (105.0, 0.0)],
        // Every bunched hand satisfies the palm rule first, so there is no
        // landmark layout that classifies as a fist.
        Gesture::Fist => return None,
    };
    Some(offsets)
}

/// Synthetic hand whose index tip sits at `tip` and which classifies as
/// `gesture`. `None` for [`Gesture::Fist`].
pub fn pose_for(gesture: Gesture, tip: Point) -> Option<HandLandmarks> {
    let offsets = tip_offsets(gesture)?;
    let hand = Finger::ALL.iter().zip(offsets).fold(HandLandmarks::new(), |hand, (finger, (dx, dy))| {
        let (x, y) = (tip.x + dx, tip.y + dy);
        // knuckle, middle joint, tip
        let joints = vec![Landmark::new(x, y + 70.0), Landmark::new(x, y + 35.0), Landmark::new(x, y)];
        hand.with_finger(*finger, joints)
    });
    Some(hand)
}

/// Reports whatever pose the UI last set; no pose means no hand.
#[derive(Debug, Default)]
pub struct PointerEstimator {
    pose: Option<(Gesture, Point)>,
}

impl PointerEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pointer` is in display (mirrored) coordinates; it is flipped back to
    /// raw video space so the engine's mirror correction puts ink under it.
    pub fn set_pose(&mut self, gesture: Gesture, pointer: Point, frame_width: usize) {
        let raw = Point::new(frame_width as f32 - pointer.x, pointer.y);
        self.pose = Some((gesture, raw));
    }

    pub fn clear_pose(&mut self) {
        self.pose = None;
    }
}

impl LandmarkEstimator for PointerEstimator {
    fn estimate(&mut self, _frame: &FrameBuffer) -> Result<Option<HandLandmarks>> {
        Ok(self.pose.and_then(|(gesture, tip)| pose_for(gesture, tip)))
    }
}
