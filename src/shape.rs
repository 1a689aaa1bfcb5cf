//! Best-effort shape recognition on the current stroke path.
//!
//! The actual classification is delegated to a [`ShapeClassifier`]; this
//! module only gates short paths, filters the returned label against the
//! known vocabulary and keeps the running score.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::types::Point;

/// Paths shorter than this are not worth classifying.
pub const MIN_SHAPE_POINTS: usize = 10;
/// Score added for every recognized vocabulary shape.
pub const SHAPE_REWARD: u32 = 10;

/// External classifier contract: any label, no vocabulary guarantees.
pub trait ShapeClassifier {
    fn classify(&mut self, points: &[Point]) -> Result<String>;
}

/// The shapes that earn score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Rectangle,
    Triangle,
    Line,
    Arrow,
}

impl Shape {
    pub const ALL: [Shape; 5] = [Shape::Circle, Shape::Rectangle, Shape::Triangle, Shape::Line, Shape::Arrow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Triangle => "triangle",
            Self::Line => "line",
            Self::Arrow => "arrow",
        }
    }

    /// Vocabulary lookup; tolerant of case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Shape> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.as_str().eq_ignore_ascii_case(label))
    }
}

/// Outcome of one recognition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    Shape(Shape),
    Unknown,
}

impl fmt::Display for Recognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recognition::Shape(shape) => f.write_str(shape.as_str()),
            Recognition::Unknown => f.write_str("unknown"),
        }
    }
}

pub struct ShapeRecognizer {
    classifier: Box<dyn ShapeClassifier>,
    min_points: usize,
    reward: u32,
    score: u32,
    last: Option<Recognition>,
}

impl ShapeRecognizer {
    pub fn new(classifier: Box<dyn ShapeClassifier>) -> Self {
        Self::with_rules(classifier, MIN_SHAPE_POINTS, SHAPE_REWARD)
    }

    pub fn with_rules(classifier: Box<dyn ShapeClassifier>, min_points: usize, reward: u32) -> Self {
        Self { classifier, min_points, reward, score: 0, last: None }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Result of the most recent attempt that actually ran.
    pub fn recognized(&self) -> Option<Recognition> {
        self.last
    }

    /// Classify `path`. Returns `None` (and does not call the classifier)
    /// when the path is too short.
    pub fn recognize(&mut self, path: &[Point]) -> Option<Recognition> {
        if path.len() < self.min_points {
            debug!(points = path.len(), min = self.min_points, "path too short for shape recognition");
            return None;
        }

        let recognition = match self.classifier.classify(path) {
            Ok(label) => match Shape::from_label(&label) {
                Some(shape) => {
                    self.score = self.score.saturating_add(self.reward);
                    Recognition::Shape(shape)
                }
                None => {
                    debug!(%label, "label outside shape vocabulary");
                    Recognition::Unknown
                }
            },
            Err(e) => {
                warn!("shape classification failed: {e}");
                Recognition::Unknown
            }
        };

        info!(shape = %recognition, score = self.score, "shape recognized");
        self.last = Some(recognition);
        Some(recognition)
    }
}

// ---------------------------------------------------------------------------
// Geometric fallback classifier
// ---------------------------------------------------------------------------

const RESAMPLE_POINTS: usize = 48;
/// A path whose ends are closer than this fraction of its length is closed.
const CLOSED_RATIO: f32 = 0.2;
/// Chord/length above which an open path is a line.
const STRAIGHT_RATIO: f32 = 0.95;
/// Turn (degrees) that counts as a corner on a closed outline.
const CORNER_DEG: f32 = 55.0;
/// Turn (degrees) near the end of an open path that counts as an arrow head.
const HOOK_DEG: f32 = 100.0;
/// Max radius spread (std/mean) for a corner-free outline to be a circle.
const ROUNDNESS: f32 = 0.2;
/// Neighbour offset used when measuring turns on the resampled path.
const TURN_SPAN: usize = 3;

/// Deterministic heuristic classifier: resamples the path to equal arc
/// length, then looks at closure, straightness, corners and roundness.
/// Returns `"scribble"` for anything it cannot place.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeometricClassifier;

impl ShapeClassifier for GeometricClassifier {
    fn classify(&mut self, points: &[Point]) -> Result<String> {
        Ok(classify_outline(points).to_string())
    }
}

fn classify_outline(points: &[Point]) -> &'static str {
    let length = path_length(points);
    if points.len() < 2 || length < 1.0 {
        return "scribble";
    }
    let mut pts = resample(points, RESAMPLE_POINTS);
    let (first, last) = (pts[0], pts[pts.len() - 1]);
    let chord = first.distance(last);

    if chord >= CLOSED_RATIO * length {
        if chord / length >= STRAIGHT_RATIO {
            return "line";
        }
        let tail_start = pts.len() * 3 / 5;
        let hooked = (tail_start.max(TURN_SPAN)..pts.len() - TURN_SPAN)
            .any(|i| turn_deg(pts[i - TURN_SPAN], pts[i], pts[i + TURN_SPAN]) > HOOK_DEG);
        return if hooked { "arrow" } else { "scribble" };
    }

    // closed outline: drop the duplicated start so indices wrap cleanly
    let interval = length / (RESAMPLE_POINTS - 1) as f32;
    if pts.len() > 2 && first.distance(last) < interval * 0.5 {
        pts.pop();
    }
    match count_corners(&pts) {
        3 => "triangle",
        4 => "rectangle",
        0 if is_round(&pts) => "circle",
        _ => "scribble",
    }
}

fn path_length(points: &[Point]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Resample into `n` points spaced evenly along the path.
fn resample(points: &[Point], n: usize) -> Vec<Point> {
    let interval = path_length(points) / (n - 1) as f32;
    let mut out = Vec::with_capacity(n);
    out.push(points[0]);

    let mut carried = 0.0;
    for w in points.windows(2) {
        let (mut start, end) = (w[0], w[1]);
        let mut seg = start.distance(end);
        while carried + seg >= interval && out.len() < n {
            let t = (interval - carried) / seg;
            let q = Point::new(start.x + t * (end.x - start.x), start.y + t * (end.y - start.y));
            out.push(q);
            seg -= interval - carried;
            start = q;
            carried = 0.0;
        }
        carried += seg;
    }
    // rounding can leave us one short
    while out.len() < n {
        out.push(points[points.len() - 1]);
    }
    out
}

/// Heading change at `b` between `a→b` and `b→c`, in degrees [0, 180].
fn turn_deg(a: Point, b: Point, c: Point) -> f32 {
    let h1 = (b.y - a.y).atan2(b.x - a.x);
    let h2 = (c.y - b.y).atan2(c.x - b.x);
    let mut d = (h2 - h1).abs();
    if d > std::f32::consts::PI {
        d = std::f32::consts::TAU - d;
    }
    d.to_degrees()
}

/// Number of separate runs of sharp turns around a closed outline.
fn count_corners(pts: &[Point]) -> usize {
    let n = pts.len();
    if n < 2 * TURN_SPAN + 1 {
        return 0;
    }
    let sharp: Vec<bool> = (0..n)
        .map(|i| {
            let a = pts[(i + n - TURN_SPAN) % n];
            let c = pts[(i + TURN_SPAN) % n];
            turn_deg(a, pts[i], c) > CORNER_DEG
        })
        .collect();
    // count rising edges, wrapping around
    (0..n).filter(|&i| sharp[i] && !sharp[(i + n - 1) % n]).count()
}

fn is_round(pts: &[Point]) -> bool {
    let n = pts.len() as f32;
    let cx = pts.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = pts.iter().map(|p| p.y).sum::<f32>() / n;
    let centre = Point::new(cx, cy);
    let radii: Vec<f32> = pts.iter().map(|p| p.distance(centre)).collect();
    let mean = radii.iter().sum::<f32>() / n;
    if mean <= f32::EPSILON {
        return false;
    }
    let var = radii.iter().map(|r| (r - mean) * (r - mean)).sum::<f32>() / n;
    var.sqrt() / mean < ROUNDNESS
}
