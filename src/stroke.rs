// Stroke bookkeeping for freehand drawing.
// `last` decides whether the next point connects or starts a new sub-path;
// `path` is what shape recognition looks at. Neither is the ink itself.

use crate::types::Point;

#[derive(Debug, Clone, Default)]
pub struct StrokeTracker {
    last: Option<Point>,
    path: Vec<Point>,
}

impl StrokeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous drawn point, or `None` when the next point starts a fresh segment.
    pub fn last_point(&self) -> Option<Point> {
        self.last
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Record a drawn point (raw, uncorrected coordinates).
    pub fn push(&mut self, p: Point) {
        self.last = Some(p);
        self.path.push(p);
    }

    /// Tracking lost: the next point must not connect, but the path survives.
    pub fn break_stroke(&mut self) {
        self.last = None;
    }

    /// Stroke finished: forget both the connection point and the path.
    pub fn end_stroke(&mut self) {
        self.last = None;
        self.path.clear();
    }
}
