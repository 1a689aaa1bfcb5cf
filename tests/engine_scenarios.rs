use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use gesture_sketch::pointer::pose_for;
use gesture_sketch::shape::ShapeClassifier;
use gesture_sketch::{
    CycleOutcome, DrawingEngine, EngineConfig, FrameBuffer, FrameLoop, Gesture, HandLandmarks, LandmarkEstimator,
    Point, Recognition, Result, Shape, ToolMode,
};

/// Always answers `label`, counting how often it was asked.
struct CountingClassifier {
    label: &'static str,
    calls: Rc<Cell<usize>>,
}

impl ShapeClassifier for CountingClassifier {
    fn classify(&mut self, _points: &[Point]) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.label.to_string())
    }
}

fn engine_with(label: &'static str) -> (DrawingEngine, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let classifier = CountingClassifier { label, calls: Rc::clone(&calls) };
    let mut engine = DrawingEngine::new(&EngineConfig::default(), Box::new(classifier));
    assert!(engine.attach_surface(640, 480));
    (engine, calls)
}

fn drawing_engine() -> DrawingEngine {
    let (mut engine, _) = engine_with("circle");
    engine.set_writing_mode(true);
    engine
}

fn pixels(engine: &DrawingEngine) -> Vec<u8> {
    engine.surface().unwrap().data().to_vec()
}

#[test]
fn spread_saturates_at_twenty() {
    let (mut e, _) = engine_with("circle");
    for _ in 0..10 {
        e.handle_gesture(Gesture::Spread, Point::default());
    }
    assert_eq!(e.shakiness(), 20);
}

#[test]
fn rock_saturates_at_zero() {
    let (mut e, _) = engine_with("circle");
    for _ in 0..4 {
        e.handle_gesture(Gesture::Spread, Point::default());
    }
    assert_eq!(e.shakiness(), 20);
    for _ in 0..10 {
        e.handle_gesture(Gesture::Rock, Point::default());
    }
    assert_eq!(e.shakiness(), 0);
}

#[test]
fn undo_reverts_to_last_snapshot_boundary() {
    let mut e = drawing_engine();
    let before = pixels(&e);

    e.snapshot();
    // two freehand mutations
    e.handle_gesture(Gesture::Point, Point::new(100.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(200.0, 150.0));
    e.handle_gesture(Gesture::Point, Point::new(300.0, 120.0));
    assert_ne!(pixels(&e), before);

    e.undo();
    assert_eq!(pixels(&e), before);
    assert_eq!(e.redo_count(), 1);
    assert_eq!(e.undo_count(), 0);
}

#[test]
fn new_mutation_after_undo_invalidates_redo() {
    let mut e = drawing_engine();
    e.snapshot();
    e.handle_gesture(Gesture::Point, Point::new(100.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(200.0, 100.0));
    e.undo();
    assert!(e.can_redo());

    e.handle_gesture(Gesture::Point, Point::new(50.0, 300.0));
    e.handle_gesture(Gesture::Point, Point::new(150.0, 300.0));
    assert_eq!(e.redo_count(), 0);
}

#[test]
fn erasing_also_invalidates_redo() {
    let mut e = drawing_engine();
    e.clear();
    e.undo();
    assert!(e.can_redo());
    e.handle_gesture(Gesture::Palm, Point::new(320.0, 240.0));
    assert!(!e.can_redo());
}

#[test]
fn redo_reapplies_undone_work() {
    let mut e = drawing_engine();
    e.snapshot();
    e.handle_gesture(Gesture::Point, Point::new(100.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(200.0, 100.0));
    let inked = pixels(&e);

    e.undo();
    e.redo();
    assert_eq!(pixels(&e), inked);
    assert_eq!(e.undo_count(), 1);
    assert_eq!(e.redo_count(), 0);
}

#[test]
fn undo_breaks_the_stroke() {
    let mut e = drawing_engine();
    e.snapshot();
    // raw 540 -> painted 100, raw 440 -> 200
    e.handle_gesture(Gesture::Point, Point::new(540.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(440.0, 100.0));
    e.undo();
    assert_eq!(e.last_point(), None);

    // raw 140 -> painted 500; must not join back to 200
    e.handle_gesture(Gesture::Point, Point::new(140.0, 100.0));
    let s = e.surface().unwrap();
    assert!(s.is_blank());
    assert_eq!(s.alpha_at(350, 100), 0);
}

#[test]
fn fist_mid_stroke_starts_a_disconnected_segment() {
    let mut e = drawing_engine();
    // raw x is mirrored: raw 540 → painted 100, raw 440 → 200, raw 240 → 400, raw 140 → 500
    e.handle_gesture(Gesture::Point, Point::new(540.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(440.0, 100.0));
    e.handle_gesture(Gesture::Fist, Point::new(440.0, 100.0));
    assert_eq!(e.last_point(), None);
    assert_eq!(e.tool_mode(), ToolMode::Move);

    e.handle_gesture(Gesture::Point, Point::new(240.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(140.0, 100.0));

    let s = e.surface().unwrap();
    assert!(s.alpha_at(150, 100) > 0, "first segment painted");
    assert!(s.alpha_at(450, 100) > 0, "second segment painted");
    assert_eq!(s.alpha_at(300, 100), 0, "no line across the gap");
}

#[test]
fn hand_loss_mid_stroke_also_leaves_a_gap() {
    let mut e = drawing_engine();
    e.handle_gesture(Gesture::Point, Point::new(540.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(440.0, 100.0));
    e.handle_no_hand();
    e.handle_gesture(Gesture::Point, Point::new(240.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(140.0, 100.0));

    assert_eq!(e.surface().unwrap().alpha_at(300, 100), 0);
    // the interrupted stroke is still one path for recognition
    assert_eq!(e.stroke_path().len(), 4);
}

#[test]
fn shape_recognition_needs_ten_points() {
    let (mut e, calls) = engine_with("triangle");
    e.set_writing_mode(true);
    for i in 0..9 {
        e.handle_gesture(Gesture::Point, Point::new(100.0 + i as f32 * 10.0, 100.0));
    }
    e.handle_gesture(Gesture::ThumbsUp, Point::default());
    assert_eq!(calls.get(), 0);
    assert_eq!(e.recognized_shape(), None);
    assert_eq!(e.score(), 0);

    e.handle_gesture(Gesture::Point, Point::new(200.0, 100.0));
    e.handle_gesture(Gesture::ThumbsUp, Point::default());
    assert_eq!(calls.get(), 1);
    assert_eq!(e.recognized_shape(), Some(Recognition::Shape(Shape::Triangle)));
    assert_eq!(e.score(), 10);
    assert_eq!(e.tool_mode(), ToolMode::Draw, "thumbs-up leaves the tool alone");
}

#[test]
fn unknown_label_scores_nothing() {
    let (mut e, calls) = engine_with("blob");
    e.set_writing_mode(true);
    for i in 0..12 {
        e.handle_gesture(Gesture::Point, Point::new(100.0 + i as f32 * 10.0, 100.0));
    }
    assert_eq!(e.recognize_shape(), Some(Recognition::Unknown));
    assert_eq!(calls.get(), 1);
    assert_eq!(e.score(), 0);
}

#[test]
fn straight_line_scenario() {
    let mut e = drawing_engine();
    e.toggle_straight_line();

    e.handle_gesture(Gesture::Point, Point::new(10.0, 10.0));
    assert_eq!(e.anchor(), Some(Point::new(10.0, 10.0)));
    assert_eq!(e.undo_count(), 0);
    assert!(e.surface().unwrap().is_blank());

    e.handle_gesture(Gesture::Point, Point::new(100.0, 10.0));
    assert_eq!(e.anchor(), None);
    assert_eq!(e.undo_count(), 1);

    let s = e.surface().unwrap();
    assert!(s.alpha_at(55, 10) > 0, "segment between the two points");
    assert!(s.alpha_at(20, 10) > 0);
    assert!(s.alpha_at(90, 10) > 0);
    assert_eq!(s.alpha_at(150, 10), 0);
    assert_eq!(s.alpha_at(55, 60), 0);
    assert!(e.stroke_path().is_empty(), "straight lines do not feed the stroke path");

    e.undo();
    assert!(e.surface().unwrap().is_blank());
}

#[test]
fn freehand_is_mirrored_back() {
    let mut e = drawing_engine();
    e.handle_gesture(Gesture::Point, Point::new(50.0, 100.0));
    e.handle_gesture(Gesture::Point, Point::new(50.0, 140.0));

    let s = e.surface().unwrap();
    assert!(s.alpha_at(590, 120) > 0);
    assert_eq!(s.alpha_at(50, 120), 0);
    // stroke path keeps the raw points
    assert_eq!(e.stroke_path(), &[Point::new(50.0, 100.0), Point::new(50.0, 140.0)]);
}

#[test]
fn palm_without_writing_mode_leaves_surface_untouched() {
    let (mut e, _) = engine_with("circle");
    e.set_writing_mode(true);
    e.handle_gesture(Gesture::Point, Point::new(300.0, 200.0));
    e.handle_gesture(Gesture::Point, Point::new(340.0, 200.0));
    e.set_writing_mode(false);
    let before = pixels(&e);

    e.handle_gesture(Gesture::Palm, Point::new(320.0, 200.0));
    assert_eq!(e.tool_mode(), ToolMode::Erase);
    assert_eq!(pixels(&e), before);
}

#[test]
fn palm_with_writing_mode_erases_under_fingertip() {
    let mut e = drawing_engine();
    e.handle_gesture(Gesture::Point, Point::new(300.0, 200.0));
    e.handle_gesture(Gesture::Point, Point::new(340.0, 200.0));
    // painted between x=300 and x=340 after mirroring
    assert!(e.surface().unwrap().alpha_at(320, 200) > 0);

    e.handle_gesture(Gesture::Palm, Point::new(320.0, 200.0));
    assert_eq!(e.surface().unwrap().alpha_at(320, 200), 0);
}

#[test]
fn gesture_and_control_paths_converge() {
    let (mut by_gesture, _) = engine_with("circle");
    let (mut by_control, _) = engine_with("circle");
    by_gesture.handle_gesture(Gesture::Pinch, Point::default());
    by_control.toggle_writing_mode();
    assert_eq!(by_gesture.writing_mode(), by_control.writing_mode());

    by_gesture.handle_gesture(Gesture::ThumbsUp, Point::default());
    by_control.recognize_shape();
    assert_eq!(by_gesture.status(), by_control.status());
}

/// Replays classified poses through the full loop.
struct Poses(VecDeque<Option<Gesture>>, Point);

impl LandmarkEstimator for Poses {
    fn estimate(&mut self, _frame: &FrameBuffer) -> Result<Option<HandLandmarks>> {
        Ok(self.0.pop_front().flatten().and_then(|g| pose_for(g, self.1)))
    }
}

#[test]
fn full_loop_pinch_then_draw() {
    let (engine, _) = engine_with("circle");
    let script = Poses(
        VecDeque::from([Some(Gesture::Pinch), Some(Gesture::Point), None, Some(Gesture::Point)]),
        Point::new(320.0, 240.0),
    );
    let mut fl = FrameLoop::new(script, engine);
    let frame = FrameBuffer::blank(2, 2);

    assert!(matches!(fl.step(&frame), CycleOutcome::Gesture { gesture: Gesture::Pinch, applied: true, .. }));
    assert!(fl.engine().writing_mode());
    fl.step(&frame);
    assert_eq!(fl.engine().last_point(), Some(Point::new(320.0, 240.0)));
    assert_eq!(fl.step(&frame), CycleOutcome::NoHand);
    assert_eq!(fl.engine().last_point(), None);
    fl.step(&frame);
    assert_eq!(fl.engine().stroke_path().len(), 2);
    assert_eq!(fl.cycles(), 4);
}
