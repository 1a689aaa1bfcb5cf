//! Gesture-driven drawing state machine.
//!
//! `DrawingEngine` owns every piece of cross-frame state: tool mode, writing
//! mode, the straight-line anchor, tremor amount, stroke bookkeeping, the ink
//! surface, its history and the shape score. Gestures and UI controls both
//! land on the same methods here, so the two input paths cannot drift apart.
//!
//! Until a surface is attached, every mutating operation is a silent no-op.

use tracing::{debug, info, warn};

use crate::config::{BRUSH_SIZE_RANGE, EngineConfig, ERASER_RADIUS_RANGE};
use crate::gesture::Gesture;
use crate::history::History;
use crate::rng::Rng32;
use crate::shape::{Recognition, ShapeClassifier, ShapeRecognizer};
use crate::stroke::StrokeTracker;
use crate::surface::{Snapshot, Surface};
use crate::types::{Color, Point};

pub const SHAKINESS_STEP: u32 = 5;
pub const SHAKINESS_MAX: u32 = 20;

/// Which tool the UI indicator shows. Changed by gestures only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    #[default]
    Draw,
    Erase,
    Color,
    Move,
}

impl ToolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Erase => "erase",
            Self::Color => "color",
            Self::Move => "move",
        }
    }
}

/// Read-only summary for status displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub tool: ToolMode,
    pub writing: bool,
    pub straight_line: bool,
    pub shakiness: u32,
    pub recognized: Option<Recognition>,
    pub score: u32,
    pub brush_size: u32,
    pub eraser_radius: u32,
    pub color: Color,
}

pub struct DrawingEngine {
    surface: Option<Surface>,
    history: History,
    stroke: StrokeTracker,
    recognizer: ShapeRecognizer,
    rng: Rng32,

    tool: ToolMode,
    writing: bool,
    straight_line: bool,
    anchor: Option<Point>, // None: waiting for the first point; Some: waiting for the second
    shakiness: u32,

    color: Color,
    brush_size: u32,
    eraser_radius: u32,
}

impl DrawingEngine {
    pub fn new(config: &EngineConfig, classifier: Box<dyn ShapeClassifier>) -> Self {
        Self {
            surface: None,
            history: History::with_depth(config.history_depth),
            stroke: StrokeTracker::new(),
            recognizer: ShapeRecognizer::with_rules(classifier, config.shape_min_points, config.shape_reward),
            rng: Rng32::from_seed(config.jitter_seed),
            tool: ToolMode::default(),
            writing: false,
            straight_line: false,
            anchor: None,
            shakiness: 0,
            color: config.color,
            brush_size: config.brush_size.clamp(BRUSH_SIZE_RANGE.0, BRUSH_SIZE_RANGE.1),
            eraser_radius: config.eraser_radius.clamp(ERASER_RADIUS_RANGE.0, ERASER_RADIUS_RANGE.1),
        }
    }

    /// Create (or recreate) the ink surface. A zero dimension leaves the
    /// engine without a surface. Replacing the surface drops all history.
    pub fn attach_surface(&mut self, width: u32, height: u32) -> bool {
        self.surface = Surface::new(width, height);
        self.history.clear();
        self.stroke.break_stroke();
        self.anchor = None;
        match &self.surface {
            Some(_) => info!(width, height, "drawing surface attached"),
            None => warn!(width, height, "drawing surface unavailable"),
        }
        self.surface.is_some()
    }

    // ----------------------------------------------------------------------
    // Per-frame input
    // ----------------------------------------------------------------------

    /// Apply one classified gesture at fingertip `tip` (raw video coordinates).
    pub fn handle_gesture(&mut self, gesture: Gesture, tip: Point) {
        match gesture {
            Gesture::Point => {
                self.tool = ToolMode::Draw;
                if self.writing {
                    if self.straight_line {
                        self.straight_line_point(tip);
                    } else {
                        self.freehand_point(tip);
                    }
                }
            }
            Gesture::Peace => {
                self.tool = ToolMode::Color;
            }
            Gesture::Palm => {
                self.tool = ToolMode::Erase;
                if self.writing {
                    self.erase_at(tip);
                }
            }
            Gesture::Fist => {
                self.tool = ToolMode::Move;
                self.stroke.end_stroke();
            }
            Gesture::ThumbsUp => {
                self.recognize_shape();
            }
            Gesture::Pinch => {
                self.toggle_writing_mode();
            }
            Gesture::Spread => {
                self.shakiness = (self.shakiness + SHAKINESS_STEP).min(SHAKINESS_MAX);
                debug!(shakiness = self.shakiness, "tremor increased");
            }
            Gesture::Rock => {
                self.shakiness = self.shakiness.saturating_sub(SHAKINESS_STEP);
                debug!(shakiness = self.shakiness, "tremor decreased");
            }
            Gesture::Open => {}
        }
    }

    /// No hand this cycle: stop connecting points, but keep the path so a
    /// stroke interrupted by tracking loss can still be recognized.
    pub fn handle_no_hand(&mut self) {
        self.stroke.break_stroke();
    }

    /// Mirror back from the selfie view so ink lands under the visible finger.
    fn corrected(&self, surface_width: u32, p: Point) -> Point {
        Point::new(surface_width as f32 - p.x, p.y)
    }

    fn freehand_point(&mut self, tip: Point) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let width = surface.width();
        if let Some(prev) = self.stroke.last_point() {
            let from = Point::new(width as f32 - prev.x, prev.y);
            let to = Point::new(width as f32 - tip.x, tip.y);
            let half = self.shakiness as f32 / 2.0;
            let mid = from.midpoint(to);
            let ctrl = Point::new(mid.x + self.rng.range(-half, half), mid.y + self.rng.range(-half, half));
            surface.stroke_curve(from, ctrl, to, self.color, self.brush_size as f32);
            self.history.invalidate_redo();
        }
        self.stroke.push(tip);
    }

    fn straight_line_point(&mut self, tip: Point) {
        if self.surface.is_none() {
            return;
        }
        match self.anchor.take() {
            None => {
                debug!(x = tip.x, y = tip.y, "straight line anchored");
                self.anchor = Some(tip);
            }
            Some(start) => {
                self.snapshot();
                if let Some(surface) = self.surface.as_mut() {
                    surface.stroke_line(start, tip, self.color, self.brush_size as f32);
                }
                info!(from = ?start, to = ?tip, "straight line committed");
            }
        }
    }

    fn erase_at(&mut self, tip: Point) {
        let Some(width) = self.surface.as_ref().map(Surface::width) else {
            return;
        };
        let center = self.corrected(width, tip);
        if let Some(surface) = self.surface.as_mut() {
            surface.erase_disk(center, self.eraser_radius as f32);
        }
        self.history.invalidate_redo();
    }

    // ----------------------------------------------------------------------
    // User controls
    // ----------------------------------------------------------------------

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Grow/shrink the brush; clamped to 1..=20.
    pub fn adjust_brush_size(&mut self, delta: i32) {
        let (lo, hi) = BRUSH_SIZE_RANGE;
        let size = (self.brush_size as i64 + delta as i64).clamp(lo as i64, hi as i64);
        self.brush_size = size as u32;
    }

    /// Set the eraser radius; clamped to 1..=50.
    pub fn set_eraser_radius(&mut self, radius: u32) {
        let (lo, hi) = ERASER_RADIUS_RANGE;
        self.eraser_radius = radius.clamp(lo, hi);
    }

    pub fn toggle_writing_mode(&mut self) {
        self.set_writing_mode(!self.writing);
    }

    pub fn set_writing_mode(&mut self, on: bool) {
        if self.writing != on {
            info!(writing = on, "writing mode");
        }
        self.writing = on;
    }

    /// Arm/disarm straight-line mode. Either way the pending anchor is
    /// forgotten and the freehand stroke is broken.
    pub fn toggle_straight_line(&mut self) {
        self.straight_line = !self.straight_line;
        self.anchor = None;
        self.stroke.break_stroke();
        info!(armed = self.straight_line, "straight-line mode");
    }

    /// Push the current surface onto the undo stack (and drop any redo).
    pub fn snapshot(&mut self) {
        if let Some(surface) = &self.surface {
            self.history.push(surface.snapshot());
        }
    }

    /// Wipe the whole surface; undoable.
    pub fn clear(&mut self) {
        if self.surface.is_none() {
            return;
        }
        self.snapshot();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        info!("surface cleared");
    }

    pub fn undo(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some(target) = self.history.undo(|| surface.snapshot()) {
            Self::restore(surface, &mut self.stroke, &target);
            info!(undo = self.history.undo_count(), redo = self.history.redo_count(), "undo");
        }
    }

    pub fn redo(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some(target) = self.history.redo(|| surface.snapshot()) {
            Self::restore(surface, &mut self.stroke, &target);
            info!(undo = self.history.undo_count(), redo = self.history.redo_count(), "redo");
        }
    }

    /// Decode `target` onto the surface before returning, so nothing can be
    /// painted onto a surface that is about to be overwritten.
    fn restore(surface: &mut Surface, stroke: &mut StrokeTracker, target: &Snapshot) {
        if let Err(e) = surface.restore(target) {
            warn!("history restore failed: {e}");
        }
        stroke.break_stroke();
    }

    /// Run shape recognition on the current stroke path.
    pub fn recognize_shape(&mut self) -> Option<Recognition> {
        self.recognizer.recognize(self.stroke.path())
    }

    // ----------------------------------------------------------------------
    // Read-only state
    // ----------------------------------------------------------------------

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn tool_mode(&self) -> ToolMode {
        self.tool
    }

    pub fn writing_mode(&self) -> bool {
        self.writing
    }

    pub fn straight_line_armed(&self) -> bool {
        self.straight_line
    }

    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    pub fn shakiness(&self) -> u32 {
        self.shakiness
    }

    pub fn recognized_shape(&self) -> Option<Recognition> {
        self.recognizer.recognized()
    }

    pub fn score(&self) -> u32 {
        self.recognizer.score()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn eraser_radius(&self) -> u32 {
        self.eraser_radius
    }

    pub fn last_point(&self) -> Option<Point> {
        self.stroke.last_point()
    }

    pub fn stroke_path(&self) -> &[Point] {
        self.stroke.path()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_count(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_count(&self) -> usize {
        self.history.redo_count()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            tool: self.tool,
            writing: self.writing,
            straight_line: self.straight_line,
            shakiness: self.shakiness,
            recognized: self.recognized_shape(),
            score: self.score(),
            brush_size: self.brush_size,
            eraser_radius: self.eraser_radius,
            color: self.color,
        }
    }
}
