// Webcam input for the sketch window.
// Visual expectation: each `next_frame()` yields one mirrored 0x00RRGGBB
// frame, so moving your hand right moves it right on screen (selfie view).

use gesture_sketch::{Error, FrameBuffer, FrameSource, Result};

use image::RgbImage;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};
use tracing::info;

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(CameraIndex::Index(index), req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream may settle on a slightly different resolution.
        let actual = cam.resolution();
        info!(index, width = actual.width(), height = actual.height(), "camera streaming");

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame (blocks until the camera delivers) as mirrored 0x00RRGGBB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;
        let rgb: RgbImage = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        let mut fb = FrameBuffer { width: w as usize, height: h as usize, pixels };
        fb.mirror_horizontal(); // visual: selfie view
        Ok(fb)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl FrameSource for CameraCapture {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        CameraCapture::next_frame(self).map(Some)
    }
}

/// Stand-in when no camera can be opened.
/// Visual: a plain dark canvas you can still draw on with the mouse.
pub struct BlankFeed {
    frame: FrameBuffer,
}

impl BlankFeed {
    pub fn new(width: usize, height: usize) -> Self {
        let mut frame = FrameBuffer::blank(width, height);
        frame.pixels.fill(0x00_1E_1E_24);
        Self { frame }
    }
}

impl FrameSource for BlankFeed {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        Ok(Some(self.frame.clone()))
    }
}
