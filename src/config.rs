//! Engine configuration.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change. Files are JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::shape::{MIN_SHAPE_POINTS, SHAPE_REWARD};
use crate::types::Color;

pub const BRUSH_SIZE_RANGE: (u32, u32) = (1, 20);
pub const ERASER_RADIUS_RANGE: (u32, u32) = (1, 50);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Freehand and straight-line stroke width (px), clamped to 1..=20.
    pub brush_size: u32,
    /// Eraser disk radius (px), clamped to 1..=50.
    pub eraser_radius: u32,
    /// Initial ink color.
    pub color: Color,
    /// Colors the UI cycles through.
    pub palette: Vec<Color>,
    /// Maximum number of undo snapshots kept.
    pub history_depth: usize,
    /// Shortest stroke path worth sending to the shape classifier.
    pub shape_min_points: usize,
    /// Score awarded per recognized shape.
    pub shape_reward: u32,
    /// Fire pinch/thumbs-up/spread/rock once per appearance instead of every frame.
    pub latch_one_shot_gestures: bool,
    /// Seed for the tremor jitter.
    pub jitter_seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            brush_size: 4,
            eraser_radius: 20,
            color: Color::default(),
            palette: vec![
                Color::rgb(0xFF, 0x3B, 0x30),
                Color::rgb(0xFF, 0xCC, 0x00),
                Color::rgb(0x34, 0xC7, 0x59),
                Color::rgb(0x00, 0x7A, 0xFF),
                Color::rgb(0xAF, 0x52, 0xDE),
                Color::rgb(0xFF, 0xFF, 0xFF),
            ],
            history_depth: 50,
            shape_min_points: MIN_SHAPE_POINTS,
            shape_reward: SHAPE_REWARD,
            latch_one_shot_gestures: true,
            jitter_seed: 0xC0FFEE,
        }
    }
}

impl EngineConfig {
    /// Load config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = BRUSH_SIZE_RANGE;
        if !(lo..=hi).contains(&self.brush_size) {
            return Err(Error::Config(format!("brush_size must be in {lo}..={hi}, got {}", self.brush_size)));
        }
        let (lo, hi) = ERASER_RADIUS_RANGE;
        if !(lo..=hi).contains(&self.eraser_radius) {
            return Err(Error::Config(format!(
                "eraser_radius must be in {lo}..={hi}, got {}",
                self.eraser_radius
            )));
        }
        if self.history_depth == 0 {
            return Err(Error::Config("history_depth must be > 0".into()));
        }
        if self.shape_min_points == 0 {
            return Err(Error::Config("shape_min_points must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = EngineConfig::default();
        c.validate().unwrap();
        assert_eq!(c.shape_min_points, 10);
        assert_eq!(c.shape_reward, 10);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sketch.json");
        std::fs::write(&path, r#"{ "brush_size": 9, "color": { "r": 1, "g": 2, "b": 3 } }"#).unwrap();

        let c = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(c.brush_size, 9);
        assert_eq!(c.color, Color::rgb(1, 2, 3));
        assert_eq!(c.eraser_radius, EngineConfig::default().eraser_radius);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "eraser_radius": 80 }"#).unwrap();
        assert!(matches!(EngineConfig::load_from_file(&path), Err(Error::Config(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let mut c = EngineConfig::default();
        c.history_depth = 7;
        c.save_to_file(&path).unwrap();
        assert_eq!(EngineConfig::load_from_file(&path).unwrap(), c);
    }

    #[test]
    fn garbage_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(EngineConfig::load_from_file(&path), Err(Error::Json(_))));
    }
}
