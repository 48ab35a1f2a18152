//! Application shell: configuration, document lifecycle and event replay.

use crate::renderer::LogRenderer;
use crate::script::{Script, ScriptError, Target};
use pinmark_core::config::{ConfigError, EditorConfig};
use pinmark_core::document::MarkerDocument;
use pinmark_core::editor::{CurveEditor, Editor, MarkerEditor};
use pinmark_core::grip::CursorKind;
use pinmark_core::render::{Renderer, render_scene};
use pinmark_core::storage::{DocumentSummary, FileStorage, MemoryStorage, Storage, StorageError};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid arguments: {0}")]
    Args(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Application configuration, built from command-line arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Document directory. `None` uses the platform data dir.
    pub storage_dir: Option<PathBuf>,
    pub document_id: String,
    /// Event script to replay. `None` replays the built-in demo.
    pub script: Option<PathBuf>,
    /// Editor config JSON. `None` uses defaults.
    pub editor_config: Option<PathBuf>,
    /// Save the document after replay.
    pub save: bool,
    /// Keep documents in memory only; nothing is read from or written to disk.
    pub scratch: bool,
    /// List stored documents instead of editing.
    pub list: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            document_id: "default".to_string(),
            script: None,
            editor_config: None,
            save: true,
            scratch: false,
            list: false,
        }
    }
}

pub const USAGE: &str = "Usage: pinmark [--storage DIR] [--document ID] [--script FILE] [--config FILE] [--no-save] [--scratch] [--list]";

impl AppConfig {
    /// Parse arguments (program name excluded).
    pub fn from_args<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| AppError::Args(format!("{} needs a value", name)))
            };
            match arg.as_str() {
                "--storage" => config.storage_dir = Some(PathBuf::from(value("--storage")?)),
                "--document" => config.document_id = value("--document")?,
                "--script" => config.script = Some(PathBuf::from(value("--script")?)),
                "--config" => config.editor_config = Some(PathBuf::from(value("--config")?)),
                "--no-save" => config.save = false,
                "--scratch" => config.scratch = true,
                "--list" => config.list = true,
                other => return Err(AppError::Args(format!("unknown argument {}\n{}", other, USAGE))),
            }
        }
        Ok(config)
    }

    /// Open the storage backend this configuration names.
    pub fn open_storage(&self) -> Result<Box<dyn Storage>, AppError> {
        if self.scratch {
            log::info!("Scratch session: documents stay in memory");
            return Ok(Box::new(MemoryStorage::new()));
        }
        let storage: Box<dyn Storage> = match &self.storage_dir {
            Some(dir) => Box::new(FileStorage::new(dir.clone())?),
            None => Box::new(FileStorage::default_location()?),
        };
        Ok(storage)
    }
}

/// Counters from one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub redraws: usize,
}

/// The pinmark application.
pub struct App {
    storage: Box<dyn Storage>,
    document: MarkerDocument,
    markers: MarkerEditor,
    curve: CurveEditor,
    cursor: CursorKind,
}

impl App {
    /// Create an app with an empty document.
    pub fn new(storage: Box<dyn Storage>, editor_config: EditorConfig, document_id: &str) -> Self {
        let mut document = MarkerDocument::new();
        document.id = document_id.to_string();
        Self {
            storage,
            document,
            markers: MarkerEditor::new(editor_config.clone()),
            curve: CurveEditor::new(editor_config),
            cursor: CursorKind::Arrow,
        }
    }

    pub fn markers(&self) -> &MarkerEditor {
        &self.markers
    }

    pub fn curve(&self) -> &CurveEditor {
        &self.curve
    }

    pub fn document(&self) -> &MarkerDocument {
        &self.document
    }

    /// Load the document from storage. A missing document starts empty.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let id = self.document.id.clone();
        match self.storage.load(&id).await {
            Ok(document) => {
                document.apply_to(&mut self.markers, &mut self.curve);
                log::info!(
                    "Loaded document {} ({} markers)",
                    document.id,
                    document.markers.len()
                );
                self.document = document;
                Ok(())
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("Document {} not found, starting empty", id);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshot the editors and write the document.
    pub async fn save(&mut self) -> Result<(), AppError> {
        self.document.capture(self.markers.markers(), self.curve.curve());
        self.storage.save(&self.document).await?;
        log::info!(
            "Saved document {} ({} markers)",
            self.document.id,
            self.document.markers.len()
        );
        Ok(())
    }

    /// Feed a script to the editors, painting after every change.
    pub fn replay(&mut self, script: &Script, renderer: &mut dyn Renderer) -> ReplayStats {
        if let Some(points) = &script.seed_curve {
            self.curve.curve_mut().set_points(points.clone());
        }
        if script.background_image.is_some() {
            self.document.background_image.clone_from(&script.background_image);
        }

        let start = Instant::now();
        let mut stats = ReplayStats::default();
        for step in &script.steps {
            let now = start + Duration::from_millis(step.at_ms);
            let editor: &mut dyn Editor = match step.target {
                Target::Markers => &mut self.markers,
                Target::Curve => &mut self.curve,
            };
            let response = editor.handle_event_at(&step.event, now);
            stats.events += 1;

            if response.cursor != self.cursor {
                log::debug!("Cursor {:?} -> {:?}", self.cursor, response.cursor);
                self.cursor = response.cursor;
            }
            if response.redraw {
                stats.redraws += 1;
                render_scene(renderer, &editor.scene());
            }
        }
        log::info!(
            "Replayed {} events ({} redraws): {} markers, {} control points",
            stats.events,
            stats.redraws,
            self.markers.markers().len(),
            self.curve.curve().len()
        );
        stats
    }

    /// Run the full lifecycle: load, replay, save.
    pub async fn run(config: AppConfig) -> Result<(), AppError> {
        let editor_config = match &config.editor_config {
            Some(path) => EditorConfig::load(path)?,
            None => EditorConfig::default(),
        };
        let storage = config.open_storage()?;
        let script = match &config.script {
            Some(path) => Script::load(path)?,
            None => Script::demo(),
        };

        let mut app = App::new(storage, editor_config, &config.document_id);
        app.load().await?;

        let mut renderer = LogRenderer::new();
        app.replay(&script, &mut renderer);
        renderer.end_frame();

        if config.save {
            app.save().await?;
        }
        Ok(())
    }

    /// Summaries of the documents in the configured storage.
    pub async fn list(config: &AppConfig) -> Result<Vec<DocumentSummary>, AppError> {
        let summaries = config.open_storage()?.list().await?;
        log::info!("{} stored documents", summaries.len());
        Ok(summaries)
    }
}
