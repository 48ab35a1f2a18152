//! Scripted input replay.
//!
//! A script is a timed list of input events, each addressed to one of the
//! two editors. Timestamps are relative to the start of replay so double
//! clicks replay deterministically.

use kurbo::Point;
use pinmark_core::input::{InputEvent, KeyEvent, Modifiers, MouseButton, PointerEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors reading a script file.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which editor receives an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Markers,
    Curve,
}

/// One timed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub target: Target,
    /// Milliseconds since the start of replay.
    #[serde(default)]
    pub at_ms: u64,
    pub event: InputEvent,
}

/// A replayable editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Control points to load before replay, replacing any stored curve.
    #[serde(default)]
    pub seed_curve: Option<Vec<Point>>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a script file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|e| ScriptError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let script = Self::from_json(&json)?;
        log::info!("Loaded script {} ({} steps)", path.display(), script.steps.len());
        Ok(script)
    }

    /// Built-in session exercising both editors.
    pub fn demo() -> Self {
        let mut builder = ScriptBuilder::default();

        // Five markers, then drop the second and fourth.
        for x in [100.0, 200.0, 300.0, 400.0, 500.0] {
            builder.press(Target::Markers, MouseButton::Right, x, 100.0);
        }
        builder.click(Target::Markers, 200.0, 100.0);
        builder.modifiers(Modifiers { shift: true, ..Modifiers::default() });
        builder.click(Target::Markers, 400.0, 100.0);
        builder.modifiers(Modifiers::default());
        builder.key(Target::Markers, "Delete");

        // Select the first marker and drag its SE grip.
        builder.click(Target::Markers, 100.0, 100.0);
        builder.press(Target::Markers, MouseButton::Left, 120.0, 120.0);
        builder.move_to(Target::Markers, 135.0, 130.0);
        builder.move_to(Target::Markers, 150.0, 140.0);
        builder.release(Target::Markers, 150.0, 140.0);

        // Extend the curve with a double click, then pull its first point.
        builder.click(Target::Curve, 1100.0, 400.0);
        builder.click(Target::Curve, 1100.0, 400.0);
        builder.pause(1000);
        builder.press(Target::Curve, MouseButton::Left, 500.0, 500.0);
        builder.move_to(Target::Curve, 475.0, 510.0);
        builder.move_to(Target::Curve, 450.0, 520.0);
        builder.release(Target::Curve, 450.0, 520.0);

        Self {
            seed_curve: Some(
                [
                    (500.0, 500.0),
                    (600.0, 700.0),
                    (600.0, 550.0),
                    (700.0, 500.0),
                    (700.0, 500.0),
                    (800.0, 400.0),
                    (1000.0, 200.0),
                    (1000.0, 500.0),
                ]
                .into_iter()
                .map(Point::from)
                .collect(),
            ),
            background_image: None,
            steps: builder.steps,
        }
    }
}

/// Appends steps 50 ms apart.
#[derive(Default)]
struct ScriptBuilder {
    steps: Vec<ScriptStep>,
    now_ms: u64,
}

const STEP_MS: u64 = 50;

impl ScriptBuilder {
    fn push(&mut self, target: Target, event: InputEvent) {
        self.steps.push(ScriptStep {
            target,
            at_ms: self.now_ms,
            event,
        });
        self.now_ms += STEP_MS;
    }

    fn pause(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    fn press(&mut self, target: Target, button: MouseButton, x: f64, y: f64) {
        let position = Point::new(x, y);
        self.push(target, InputEvent::Pointer(PointerEvent::Down { position, button }));
    }

    fn release(&mut self, target: Target, x: f64, y: f64) {
        let position = Point::new(x, y);
        let button = MouseButton::Left;
        self.push(target, InputEvent::Pointer(PointerEvent::Up { position, button }));
    }

    fn move_to(&mut self, target: Target, x: f64, y: f64) {
        let position = Point::new(x, y);
        self.push(target, InputEvent::Pointer(PointerEvent::Move { position }));
    }

    fn click(&mut self, target: Target, x: f64, y: f64) {
        self.press(target, MouseButton::Left, x, y);
        self.release(target, x, y);
    }

    fn key(&mut self, target: Target, name: &str) {
        self.push(target, InputEvent::Key(KeyEvent::Pressed(name.to_string())));
        self.push(target, InputEvent::Key(KeyEvent::Released(name.to_string())));
    }

    /// Modifier state is per editor, so both get it.
    fn modifiers(&mut self, modifiers: Modifiers) {
        self.push(Target::Markers, InputEvent::Modifiers(modifiers));
        self.push(Target::Curve, InputEvent::Modifiers(modifiers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let json = r#"{
            "background_image": "board.png",
            "steps": [
                {"target": "markers", "at_ms": 0,
                 "event": {"pointer": {"Down": {"position": {"x": 10, "y": 20}, "button": "Right"}}}},
                {"target": "curve", "event": {"key": {"Pressed": "Escape"}}}
            ]
        }"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(script.background_image.as_deref(), Some("board.png"));
        assert_eq!(script.steps.len(), 2);
        assert_eq!(script.steps[1].target, Target::Curve);
        assert_eq!(script.steps[1].at_ms, 0);
        assert!(script.seed_curve.is_none());
    }

    #[test]
    fn test_demo_timestamps_increase() {
        let script = Script::demo();
        assert!(!script.steps.is_empty());
        assert!(script.steps.windows(2).all(|w| w[0].at_ms < w[1].at_ms));
        assert_eq!(script.seed_curve.as_ref().map(Vec::len), Some(8));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Script::load(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(matches!(err, ScriptError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/script.json"));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"{ \"steps\": 3 }").unwrap();
        let err = Script::load(file.path()).unwrap_err();
        assert!(matches!(err, ScriptError::Parse(_)));
    }
}
