// What you SEE:
// • The mirrored webcam feed, with your ink floating on top.
// • The mouse stands in for your hand: its position is the index fingertip.
//   LMB = point (draw), RMB = palm (erase), nothing held = open hand.
//   Keys 1-7 hold a pose: 1 peace, 2 thumbs-up, 3 pinch, 4 spread, 5 rock, 6 point, 7 palm.
// • W writing mode, L straight lines, F fist (end stroke), S recognize shape.
// • U undo, R redo, C clear, [ ] brush size, - = eraser size, K next color.
// • SPACE pauses the gesture loop. ESC quits.

mod camera;
mod draw;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use camera::{BlankFeed, CameraCapture};
use draw::{Drawer, draw_crosshair, draw_ring, draw_text_5x7};
use gesture_sketch::pointer::PointerEstimator;
use gesture_sketch::{
    DrawingEngine, EngineConfig, EngineStatus, FrameBuffer, FrameLoop, FrameSource, GeometricClassifier, Gesture, Point,
    Result, ToolMode, init_logging,
};
use minifb::Key;
use tracing::{info, warn};

const DEFAULT_SIZE: (u32, u32) = (640, 480);

/// Config path: first CLI argument, else $GESTURE_SKETCH_CONFIG, else defaults.
fn load_config() -> Result<EngineConfig> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("GESTURE_SKETCH_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EngineConfig::load_from_file(&path)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Which pose the pointer is holding this frame.
fn held_pose(drawer: &Drawer) -> Gesture {
    const KEYED: [(Key, Gesture); 7] = [
        (Key::Key1, Gesture::Peace),
        (Key::Key2, Gesture::ThumbsUp),
        (Key::Key3, Gesture::Pinch),
        (Key::Key4, Gesture::Spread),
        (Key::Key5, Gesture::Rock),
        (Key::Key6, Gesture::Point),
        (Key::Key7, Gesture::Palm),
    ];
    if let Some((_, g)) = KEYED.iter().find(|(k, _)| drawer.key_down(*k)) {
        return *g;
    }
    if drawer.left_mouse_down() {
        Gesture::Point
    } else if drawer.right_mouse_down() {
        Gesture::Palm
    } else {
        Gesture::Open
    }
}

/// The camera may renegotiate its resolution mid-stream. Follow it with a
/// fresh surface so frames keep being presented. Returns true on a change.
fn follow_frame_size(engine: &mut DrawingEngine, size: &mut (usize, usize), frame: &FrameBuffer) -> bool {
    if (frame.width, frame.height) == *size {
        return false;
    }
    warn!(from = ?*size, to = ?(frame.width, frame.height), "frame size changed; ink reset");
    *size = (frame.width, frame.height);
    engine.attach_surface(frame.width as u32, frame.height as u32);
    true
}

fn hud_line(status: &EngineStatus, paused: bool, fps_text: &str) -> String {
    let shape = status.recognized.map_or_else(|| "-".to_string(), |r| r.to_string());
    format!(
        "{}{} | WRITE {} | LINE {} | SHAKE {} | BRUSH {} ERASER {} | SHAPE {} SCORE {} | {}",
        if paused { "PAUSED | " } else { "" },
        status.tool.as_str(),
        if status.writing { "ON" } else { "OFF" },
        if status.straight_line { "ON" } else { "OFF" },
        status.shakiness,
        status.brush_size,
        status.eraser_radius,
        shape,
        status.score,
        fps_text,
    )
}

fn main() -> Result<()> {
    init_logging();
    let config = load_config()?;

    /* --- Camera (or a blank stand-in) + window --- */
    let mut feed: Box<dyn FrameSource> = match CameraCapture::new(0, DEFAULT_SIZE.0, DEFAULT_SIZE.1) {
        Ok(cam) => {
            let (w, h) = cam.resolution();
            info!(w, h, "using webcam");
            Box::new(cam)
        }
        Err(e) => {
            warn!("no camera ({e}); drawing on a blank feed");
            Box::new(BlankFeed::new(DEFAULT_SIZE.0 as usize, DEFAULT_SIZE.1 as usize))
        }
    };
    let Some(first) = feed.next_frame()? else {
        return Ok(());
    };
    let mut size = (first.width, first.height);
    let (w, h) = size;
    let mut drawer = Drawer::new("Gesture Sketch", w, h)?;

    /* --- Engine + loop --- */
    let mut engine = DrawingEngine::new(&config, Box::new(GeometricClassifier));
    engine.attach_surface(w as u32, h as u32);
    let mut frame_loop =
        FrameLoop::new(PointerEstimator::new(), engine).with_latching(config.latch_one_shot_gestures);
    let stop = frame_loop.stop_handle();
    let mut palette_idx = 0usize;

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    while drawer.is_open() && !drawer.esc_pressed() {
        let Some(mut screen) = feed.next_frame()? else {
            break;
        };
        follow_frame_size(frame_loop.engine_mut(), &mut size, &screen);
        let w = size.0;

        /* 1) Pointer → synthetic hand → one loop cycle */
        let pointer = drawer.mouse_pos().map(|(x, y)| Point::new(x, y));
        match pointer {
            Some(p) => frame_loop.estimator_mut().set_pose(held_pose(&drawer), p, w),
            None => frame_loop.estimator_mut().clear_pose(), // pointer left the window: no hand
        }
        frame_loop.step(&screen);

        /* 2) Direct controls (same engine methods the gestures use) */
        if drawer.key_pressed_once(Key::Space) {
            if stop.is_stopped() { stop.resume() } else { stop.stop() }
        }
        let engine = frame_loop.engine_mut();
        if drawer.key_pressed_once(Key::F) {
            let tip = pointer.map_or(Point::default(), |p| Point::new(w as f32 - p.x, p.y));
            engine.handle_gesture(Gesture::Fist, tip);
        }
        if drawer.key_pressed_once(Key::W) { engine.toggle_writing_mode(); }
        if drawer.key_pressed_once(Key::L) { engine.toggle_straight_line(); }
        if drawer.key_pressed_once(Key::S) { engine.recognize_shape(); }
        if drawer.key_pressed_once(Key::U) { engine.undo(); }
        if drawer.key_pressed_once(Key::R) { engine.redo(); }
        if drawer.key_pressed_once(Key::C) { engine.clear(); }
        if drawer.key_pressed_once(Key::LeftBracket) { engine.adjust_brush_size(-1); }
        if drawer.key_pressed_once(Key::RightBracket) { engine.adjust_brush_size(1); }
        if drawer.key_pressed_once(Key::Minus) {
            let r = engine.eraser_radius().saturating_sub(5);
            engine.set_eraser_radius(r);
        }
        if drawer.key_pressed_once(Key::Equal) {
            let r = engine.eraser_radius() + 5;
            engine.set_eraser_radius(r);
        }
        if drawer.key_pressed_once(Key::K) && !config.palette.is_empty() {
            palette_idx = (palette_idx + 1) % config.palette.len();
            engine.set_color(config.palette[palette_idx]);
        }

        /* 3) Compose: video, ink, pointer overlay, HUD */
        let engine = frame_loop.engine();
        if let Some(surface) = engine.surface() {
            surface.composite_onto(&mut screen);
        }
        let status = engine.status();
        if let Some(p) = pointer {
            let (x, y) = (p.x as i32, p.y as i32);
            draw_crosshair(&mut screen, x, y, 12, status.color.to_u32());
            if status.tool == ToolMode::Erase {
                draw_ring(&mut screen, x, y, status.eraser_radius as i32, 0x00_FF_FF_FF);
            }
        }
        if let Some(anchor) = engine.anchor() {
            // straight lines are painted in raw coordinates; mark where this one starts
            draw_crosshair(&mut screen, anchor.x as i32, anchor.y as i32, 6, 0x00_00_FF_FF);
        }
        let hud = hud_line(&status, stop.is_stopped(), &hud_fps_text);
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        /* 4) FPS counter (HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            hud_fps_text = format!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!(score = frame_loop.engine().score(), cycles = frame_loop.cycles(), "sketch closed");
    Ok(())
}
