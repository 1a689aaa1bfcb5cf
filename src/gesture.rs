//! Hand gesture classification from fingertip geometry.
//!
//! A fixed-priority decision list over fingertip distances and heights. The
//! first matching rule wins, so a pose that also satisfies a later (possibly
//! more specific) rule still resolves to the earlier one.

use tracing::trace;

use crate::error::Result;
use crate::landmarks::HandLandmarks;

/// Fingertips closer than this (px) count as touching.
pub const TOUCH_PX: f32 = 30.0;
/// Fingertips farther than this (px) count as apart.
pub const APART_PX: f32 = 40.0;
/// Every neighbouring pair farther than this (px) counts as spread.
pub const SPREAD_PX: f32 = 50.0;
/// Thumb-index distance (px) below which the pose is a pinch.
pub const PINCH_PX: f32 = 20.0;

/// Recognized hand poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Thumb on index, index away from middle. Draws.
    Point,
    /// Index and middle together, ring apart. Opens the color picker.
    Peace,
    /// Index to pinky bunched. Erases.
    Palm,
    /// All five tips bunched. Ends the stroke.
    Fist,
    /// Thumb tip above every other tip. Runs shape recognition.
    ThumbsUp,
    /// Thumb and index tips nearly touching. Toggles writing mode.
    Pinch,
    /// All neighbouring tips far apart. More tremor.
    Spread,
    /// Tips step upward from index to pinky. Less tremor.
    Rock,
    /// Nothing else matched. Idle.
    Open,
}

impl Gesture {
    pub const ALL: [Gesture; 9] = [
        Gesture::Point,
        Gesture::Peace,
        Gesture::Palm,
        Gesture::Fist,
        Gesture::ThumbsUp,
        Gesture::Pinch,
        Gesture::Spread,
        Gesture::Rock,
        Gesture::Open,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Peace => "peace",
            Self::Palm => "palm",
            Self::Fist => "fist",
            Self::ThumbsUp => "thumbsUp",
            Self::Pinch => "pinch",
            Self::Spread => "spread",
            Self::Rock => "rock",
            Self::Open => "open",
        }
    }

    /// Gestures that act once per appearance rather than continuously.
    pub fn is_one_shot(&self) -> bool {
        matches!(self, Self::Pinch | Self::ThumbsUp | Self::Spread | Self::Rock)
    }
}

/// Classify one hand. Fails only when a finger group is missing or empty.
pub fn classify(hand: &HandLandmarks) -> Result<Gesture> {
    let [thumb, index, middle, ring, pinky] = hand.tips()?;
    let (thumb, index, middle, ring, pinky) =
        (thumb.point(), index.point(), middle.point(), ring.point(), pinky.point());

    let ti = thumb.distance(index);
    let im = index.distance(middle);
    let mr = middle.distance(ring);
    let rp = ring.distance(pinky);
    trace!(ti, im, mr, rp, "fingertip distances");

    let gesture = if ti < TOUCH_PX && im > APART_PX {
        Gesture::Point
    } else if im < TOUCH_PX && mr > APART_PX {
        Gesture::Peace
    } else if im < TOUCH_PX && mr < TOUCH_PX && rp < TOUCH_PX {
        Gesture::Palm
    } else if ti < TOUCH_PX && im < TOUCH_PX && mr < TOUCH_PX && rp < TOUCH_PX {
        Gesture::Fist
    } else if thumb.y < index.y && thumb.y < middle.y && thumb.y < ring.y && thumb.y < pinky.y {
        Gesture::ThumbsUp
    } else if ti < PINCH_PX {
        Gesture::Pinch
    } else if im > SPREAD_PX && mr > SPREAD_PX && rp > SPREAD_PX {
        Gesture::Spread
    } else if index.y > middle.y && middle.y > ring.y && ring.y > pinky.y {
        Gesture::Rock
    } else {
        Gesture::Open
    };
    Ok(gesture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::landmarks::{Finger, Landmark};

    fn hand(tips: [(f32, f32); 5]) -> HandLandmarks {
        Finger::ALL.iter().zip(tips).fold(HandLandmarks::new(), |h, (finger, (x, y))| {
            // a knuckle joint below the tip, so sequences have real length
            h.with_finger(*finger, vec![Landmark::new(x, y + 60.0), Landmark::new(x, y)])
        })
    }

    #[test]
    fn point() {
        let h = hand([(110.0, 110.0), (100.0, 100.0), (160.0, 140.0), (220.0, 140.0), (280.0, 140.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Point);
    }

    #[test]
    fn peace() {
        let h = hand([(20.0, 160.0), (100.0, 100.0), (120.0, 100.0), (200.0, 160.0), (260.0, 160.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Peace);
    }

    #[test]
    fn palm() {
        let h = hand([(20.0, 160.0), (100.0, 100.0), (120.0, 100.0), (140.0, 100.0), (160.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Palm);
    }

    #[test]
    fn fully_bunched_hand_resolves_to_palm_before_fist() {
        // Satisfies every fist predicate, but the palm rule is tested first.
        let h = hand([(105.0, 105.0), (100.0, 100.0), (110.0, 100.0), (120.0, 100.0), (130.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Palm);
    }

    #[test]
    fn point_wins_over_fist_predicates() {
        // thumb touches index (shared with fist) and middle/ring/pinky are bunched,
        // but index is far from middle so rule 1 matches first.
        let h = hand([(110.0, 100.0), (100.0, 100.0), (150.0, 100.0), (160.0, 100.0), (170.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Point);
    }

    #[test]
    fn thumbs_up() {
        let h = hand([(20.0, 20.0), (100.0, 100.0), (150.0, 100.0), (200.0, 100.0), (250.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::ThumbsUp);
    }

    #[test]
    fn pinch() {
        let h = hand([(110.0, 105.0), (100.0, 100.0), (135.0, 100.0), (170.0, 100.0), (205.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Pinch);
    }

    #[test]
    fn spread() {
        let h = hand([(40.0, 160.0), (100.0, 100.0), (160.0, 100.0), (220.0, 100.0), (280.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Spread);
    }

    #[test]
    fn rock() {
        let h = hand([(40.0, 160.0), (100.0, 100.0), (135.0, 90.0), (170.0, 80.0), (205.0, 70.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Rock);
    }

    #[test]
    fn open_when_nothing_matches() {
        let h = hand([(40.0, 160.0), (100.0, 100.0), (135.0, 100.0), (170.0, 100.0), (205.0, 100.0)]);
        assert_eq!(classify(&h).unwrap(), Gesture::Open);
    }

    #[test]
    fn missing_finger_fails_fast() {
        let h = HandLandmarks::new()
            .with_finger(Finger::Thumb, vec![Landmark::new(0.0, 0.0)])
            .with_finger(Finger::IndexFinger, vec![Landmark::new(0.0, 0.0)]);
        assert!(matches!(classify(&h), Err(Error::MalformedLandmarks("middleFinger"))));
    }

    #[test]
    fn total_over_a_grid_of_poses() {
        // Any well-formed hand yields exactly one of the nine gestures.
        for step in 0..40 {
            let s = step as f32 * 7.0;
            let h = hand([(s, 200.0 - s), (100.0, 100.0), (100.0 + s, 90.0), (120.0, 80.0 + s), (s * 2.0, 70.0)]);
            let g = classify(&h).unwrap();
            assert!(Gesture::ALL.contains(&g));
        }
    }
}
