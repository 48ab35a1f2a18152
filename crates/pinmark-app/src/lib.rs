//! Pinmark Application
//!
//! Headless host shell: argument parsing, document loading and saving,
//! and scripted replay of input events through the editors.

mod app;
mod renderer;
mod script;

pub use app::{App, AppConfig, AppError, ReplayStats, USAGE};
pub use renderer::LogRenderer;
pub use script::{Script, ScriptError, ScriptStep, Target};
