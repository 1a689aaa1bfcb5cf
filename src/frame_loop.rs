//! Cooperative, self-paced frame loop.
//!
//! Each cycle pulls one frame, makes exactly one estimator call, and only
//! then classifies and draws. The next cycle starts after the previous one
//! finished, so there is never more than one estimate in flight and frames
//! never queue up; a slow estimator just lowers the frame rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::engine::DrawingEngine;
use crate::error::Result;
use crate::gesture::{self, Gesture};
use crate::landmarks::{Finger, HandLandmarks};
use crate::types::{FrameBuffer, Point};

/// External hand-landmark model: zero or one hand per frame.
/// An `Err` is a rejected call and is treated as "no hand" for that cycle.
pub trait LandmarkEstimator {
    fn estimate(&mut self, frame: &FrameBuffer) -> Result<Option<HandLandmarks>>;
}

/// Where frames come from. `Ok(None)` means the source is exhausted.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>>;
}

/// Cloneable stop flag shared between the loop and whoever controls it.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// The loop was stopped before or during estimation; nothing was applied.
    Cancelled,
    /// No hand, or the estimator rejected the call.
    NoHand,
    /// A hand was reported but a finger group was missing.
    Malformed,
    /// A gesture was classified. `applied` is false when a held one-shot
    /// gesture was suppressed by latching.
    Gesture { gesture: Gesture, tip: Point, applied: bool },
}

pub struct FrameLoop<E> {
    estimator: E,
    engine: DrawingEngine,
    stop: StopHandle,
    latch_one_shots: bool,
    previous: Option<Gesture>,
    estimator_failing: bool,
    cycles: u64,
}

impl<E: LandmarkEstimator> FrameLoop<E> {
    pub fn new(estimator: E, engine: DrawingEngine) -> Self {
        Self {
            estimator,
            engine,
            stop: StopHandle::new(),
            latch_one_shots: true,
            previous: None,
            estimator_failing: false,
            cycles: 0,
        }
    }

    /// When on (the default), pinch/thumbs-up/spread/rock act only on the
    /// cycle they first appear; holding the pose does not repeat them.
    pub fn with_latching(mut self, on: bool) -> Self {
        self.latch_one_shots = on;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn engine(&self) -> &DrawingEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut DrawingEngine {
        &mut self.engine
    }

    pub fn estimator_mut(&mut self) -> &mut E {
        &mut self.estimator
    }

    /// Completed (non-cancelled) cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle on `frame`.
    pub fn step(&mut self, frame: &FrameBuffer) -> CycleOutcome {
        if self.stop.is_stopped() {
            self.lose_hand();
            return CycleOutcome::Cancelled;
        }

        let estimate = self.estimator.estimate(frame);

        // stopped while the estimate was in flight: drop the result
        if self.stop.is_stopped() {
            debug!("loop stopped during estimation; result discarded");
            self.lose_hand();
            return CycleOutcome::Cancelled;
        }
        self.cycles += 1;

        let hand = match estimate {
            Ok(hand) => {
                if self.estimator_failing {
                    info!("landmark estimator recovered");
                    self.estimator_failing = false;
                }
                hand
            }
            Err(e) => {
                if !self.estimator_failing {
                    warn!("landmark estimator failed: {e}");
                    self.estimator_failing = true;
                }
                None
            }
        };

        let Some(hand) = hand else {
            self.lose_hand();
            return CycleOutcome::NoHand;
        };

        let classified = gesture::classify(&hand).and_then(|g| Ok((g, hand.tip(Finger::IndexFinger)?.point())));
        let (gesture, tip) = match classified {
            Ok(found) => found,
            Err(e) => {
                debug!("treating malformed hand as no hand: {e}");
                self.lose_hand();
                return CycleOutcome::Malformed;
            }
        };

        if self.previous != Some(gesture) {
            debug!(gesture = gesture.as_str(), "gesture changed");
        }
        let repeated = self.previous == Some(gesture);
        self.previous = Some(gesture);

        let applied = !(self.latch_one_shots && gesture.is_one_shot() && repeated);
        if applied {
            self.engine.handle_gesture(gesture, tip);
        }
        CycleOutcome::Gesture { gesture, tip, applied }
    }

    fn lose_hand(&mut self) {
        self.previous = None;
        self.engine.handle_no_hand();
    }

    /// Drive cycles until stopped or `source` runs dry. Returns the number of
    /// cycles completed during this call.
    pub fn run<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<u64> {
        let start = self.cycles;
        while !self.stop.is_stopped() {
            let Some(frame) = source.next_frame()? else {
                break;
            };
            self.step(&frame);
        }
        Ok(self.cycles - start)
    }
}
