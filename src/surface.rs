//! Persistent ink layer.
//!
//! A transparent RGBA raster (tiny-skia `Pixmap`, premultiplied) that
//! accumulates every committed stroke. It is composited over the live video
//! for display and copied into [`Snapshot`] blobs for undo/redo.

use tiny_skia::{
    BlendMode, Color as SkColor, FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap,
    Stroke, Transform,
};

use crate::error::{Error, Result};
use crate::types::{Color, FrameBuffer, Point};

pub struct Surface {
    pixmap: Pixmap,
}

/// Opaque copy of a surface's pixels, as stored on the history stacks.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

fn ink_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

impl Surface {
    /// `None` when either side is zero: there is nothing to draw on yet.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Ink coverage at a pixel; 0 outside the surface.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.pixmap.pixel(x, y).map_or(0, |p| p.alpha())
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.data().chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Quadratic curve `from → to` bent toward `ctrl`, round caps.
    /// Visual: one smooth freehand segment.
    pub fn stroke_curve(&mut self, from: Point, ctrl: Point, to: Point, color: Color, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.quad_to(ctrl.x, ctrl.y, to.x, to.y);
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &ink_paint(color), &round_stroke(width), Transform::identity(), None);
        }
    }

    /// Straight segment with round caps.
    pub fn stroke_line(&mut self, from: Point, to: Point, color: Color, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &ink_paint(color), &round_stroke(width), Transform::identity(), None);
        }
    }

    /// Remove ink inside a filled disk (clear composition, not white paint).
    /// Visual: the video shows through where the eraser passed.
    pub fn erase_disk(&mut self, center: Point, radius: f32) {
        let Some(circle) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Wipe everything.
    pub fn clear(&mut self) {
        self.pixmap.fill(SkColor::TRANSPARENT);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            bytes: self.pixmap.data().to_vec(),
        }
    }

    /// Replace the surface contents with a previously taken snapshot.
    /// The blob must have been taken from a surface of the same size.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.width != self.width() || snapshot.height != self.height() {
            return Err(Error::Snapshot(format!(
                "size mismatch: snapshot {}x{}, surface {}x{}",
                snapshot.width,
                snapshot.height,
                self.width(),
                self.height()
            )));
        }
        let size = IntSize::from_wh(snapshot.width, snapshot.height)
            .ok_or_else(|| Error::Snapshot("zero-sized snapshot".into()))?;
        self.pixmap = Pixmap::from_vec(snapshot.bytes.clone(), size)
            .ok_or_else(|| Error::Snapshot("blob length does not match its size".into()))?;
        Ok(())
    }

    /// Alpha-blend the ink over a video frame of the same size.
    /// Visual: strokes float on top of the live feed.
    pub fn composite_onto(&self, fb: &mut FrameBuffer) {
        if fb.width != self.width() as usize || fb.height != self.height() as usize {
            return;
        }
        for (dst, src) in fb.pixels.iter_mut().zip(self.pixmap.data().chunks_exact(4)) {
            let a = src[3] as u32;
            if a == 0 {
                continue; // no ink: keep the video pixel
            }
            let inv = 255 - a;
            // src is premultiplied, so out = src + dst * (1 - a)
            let blend = |s: u8, d: u32| (s as u32 + (d * inv + 127) / 255).min(255);
            let r = blend(src[0], (*dst >> 16) & 0xFF);
            let g = blend(src[1], (*dst >> 8) & 0xFF);
            let b = blend(src[2], *dst & 0xFF);
            *dst = (r << 16) | (g << 8) | b;
        }
    }
}
