//! Hand landmark snapshots as delivered by the external estimator.
//!
//! A snapshot maps each finger to its joints, ordered from the knuckle
//! outwards; the last joint is the fingertip. Snapshots are rebuilt every
//! cycle and never retained.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Point;

/// The five finger groups the estimator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Finger {
    Thumb,
    IndexFinger,
    MiddleFinger,
    RingFinger,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::IndexFinger,
        Finger::MiddleFinger,
        Finger::RingFinger,
        Finger::Pinky,
    ];

    /// Name used on the wire and in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::IndexFinger => "indexFinger",
            Self::MiddleFinger => "middleFinger",
            Self::RingFinger => "ringFinger",
            Self::Pinky => "pinky",
        }
    }
}

/// One joint position. `z` stays 0.0 for 2-D estimators.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Projection onto the image plane.
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Landmarks for a single detected hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    fingers: BTreeMap<Finger, Vec<Landmark>>,
}

impl HandLandmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; replaces any joints already stored for `finger`.
    pub fn with_finger(mut self, finger: Finger, joints: Vec<Landmark>) -> Self {
        self.fingers.insert(finger, joints);
        self
    }

    /// Last joint of `finger`.
    pub fn tip(&self, finger: Finger) -> Result<Landmark> {
        self.fingers
            .get(&finger)
            .and_then(|joints| joints.last().copied())
            .ok_or(Error::MalformedLandmarks(finger.as_str()))
    }

    /// Tips of all five fingers in [`Finger::ALL`] order.
    /// Fails on the first finger that is missing or empty.
    pub fn tips(&self) -> Result<[Landmark; 5]> {
        Ok([
            self.tip(Finger::Thumb)?,
            self.tip(Finger::IndexFinger)?,
            self.tip(Finger::MiddleFinger)?,
            self.tip(Finger::RingFinger)?,
            self.tip(Finger::Pinky)?,
        ])
    }
}
