use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use fiszki_lib::config::{self, AppConfig};
use fiszki_lib::flashcards::seed;
use fiszki_lib::flashcards::{
    open_or_deferred, Flashcard, FlashcardStore, LessonId, LessonSummary, SqliteFlashcardStore,
};
use fiszki_lib::session::{AnswerPresenter, LessonController};

/// Shared application state for CLI commands
pub struct App {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    pub store: Arc<dyn FlashcardStore>,
}

impl App {
    /// Open the store and seed it when empty (if enabled)
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let app = Self::open(data_dir)?;
        app.seed_on_start();
        Ok(app)
    }

    /// Like [`App::new`], but a database that cannot be opened is not fatal:
    /// the quiz starts with a store that retries the open on every call.
    #[cfg_attr(not(feature = "tui"), allow(dead_code))]
    pub fn interactive(data_dir: Option<&Path>) -> Result<Self> {
        let (data_dir, config) = Self::settings(data_dir)?;
        let store = open_or_deferred(config.database_path(&data_dir));

        let app = Self {
            data_dir,
            config,
            store,
        };
        app.seed_on_start();
        Ok(app)
    }

    /// Open the store without seeding
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let (data_dir, config) = Self::settings(data_dir)?;

        let db_path = config.database_path(&data_dir);
        let store = SqliteFlashcardStore::open(db_path.clone())
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;
        log::debug!("Opened flashcard store at {}", db_path.display());

        Ok(Self {
            data_dir,
            config,
            store: Arc::new(store),
        })
    }

    fn settings(data_dir: Option<&Path>) -> Result<(PathBuf, AppConfig)> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => config::default_data_dir().context("Failed to get data directory")?,
        };

        let config = config::load_config(&data_dir)
            .with_context(|| format!("Failed to read settings in {}", data_dir.display()))?;
        Ok((data_dir, config))
    }

    fn seed_on_start(&self) {
        if !self.config.seed_on_start {
            return;
        }
        // A failed seed leaves an empty store; lessons then show as empty
        if let Err(e) = seed::ensure_sample_data(self.store.as_ref()) {
            log::error!("Failed to insert sample flashcards: {}", e);
        }
    }

    /// Controller for an interactive session on this store
    #[cfg_attr(not(feature = "tui"), allow(dead_code))]
    pub fn controller(&self) -> LessonController {
        let presenter = AnswerPresenter::new(self.config.answer_placeholder.clone());
        LessonController::new(Arc::clone(&self.store), presenter)
    }

    /// List lessons with at least one flashcard
    pub fn list_lessons(&self) -> Result<Vec<LessonSummary>> {
        self.store.list_lessons().context("Failed to list lessons")
    }

    /// Flashcards of one lesson
    pub fn lesson_flashcards(&self, lesson_id: LessonId) -> Result<Vec<Flashcard>> {
        self.store
            .fetch_by_lesson(lesson_id)
            .context(format!("Failed to load lesson {}", lesson_id))
    }

    /// Human-readable lesson name
    pub fn lesson_label(lesson_id: LessonId) -> String {
        match seed::lesson_title(lesson_id) {
            Some(title) => format!("Lekcja {}: {}", lesson_id, title),
            None => format!("Lekcja {}", lesson_id),
        }
    }
}
