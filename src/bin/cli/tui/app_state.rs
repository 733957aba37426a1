use std::sync::Arc;

use anyhow::Result;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, watch};

use crate::app::App;
use fiszki_lib::flashcards::{LessonId, LessonSummary};
use fiszki_lib::session::{Advance, LessonController, LoadOutcome, NextStep, SessionSnapshot, Verdict};

/// One-line message shown in the status bar until the next keypress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Info(String),
    Error(String),
}

impl Flash {
    pub fn text(&self) -> &str {
        match self {
            Flash::Info(text) | Flash::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Flash::Error(_))
    }
}

pub struct TuiState {
    pub app: App,
    controller: Arc<LessonController>,
    runtime: Runtime,

    // Session state, refreshed from the controller each frame
    updates: watch::Receiver<SessionSnapshot>,
    pub snapshot: SessionSnapshot,
    outcomes_tx: mpsc::UnboundedSender<LoadOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<LoadOutcome>,

    // Lesson tabs
    pub lessons: Vec<LessonSummary>,
    pub selected_lesson: LessonId,

    pub flash_message: Option<Flash>,
    pub show_help: bool,
    pub quit: bool,
}

impl TuiState {
    pub fn new(app: App, lesson: Option<LessonId>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let controller = Arc::new(app.controller());
        let updates = controller.subscribe();
        let snapshot = controller.snapshot();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        let selected_lesson = lesson.unwrap_or(app.config.default_lesson);

        let mut state = Self {
            app,
            controller,
            runtime,
            updates,
            snapshot,
            outcomes_tx,
            outcomes_rx,
            lessons: Vec::new(),
            selected_lesson,
            flash_message: None,
            show_help: false,
            quit: false,
        };

        state.reload_lessons();
        state.load_lesson(selected_lesson);
        Ok(state)
    }

    /// Re-read the lesson list for the tabs
    pub fn reload_lessons(&mut self) {
        match self.app.list_lessons() {
            Ok(lessons) => self.lessons = lessons,
            Err(e) => {
                log::error!("{:#}", e);
                self.flash_message = Some(Flash::Error("Nie udało się wczytać listy lekcji".to_string()));
            }
        }
    }

    /// Start loading a lesson in the background
    pub fn load_lesson(&mut self, lesson_id: LessonId) {
        self.selected_lesson = lesson_id;
        let controller = Arc::clone(&self.controller);
        let outcomes = self.outcomes_tx.clone();

        self.runtime.spawn(async move {
            let outcome = controller.load_lesson(lesson_id).await;
            let _ = outcomes.send(outcome);
        });
    }

    /// Pull the latest snapshot and report finished loads
    pub fn refresh(&mut self) {
        if self.updates.has_changed().unwrap_or(false) {
            self.snapshot = self.updates.borrow_and_update().clone();
        }

        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            if let LoadOutcome::Failed { lesson_id, error } = outcome {
                self.flash_message = Some(Flash::Error(format!(
                    "Nie udało się wczytać: {} ({})",
                    App::lesson_label(lesson_id),
                    error
                )));
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    /// Tab index of the selected lesson, if it is in the list
    pub fn selected_tab(&self) -> Option<usize> {
        self.lessons
            .iter()
            .position(|l| l.lesson_id == self.selected_lesson)
    }

    pub fn next_lesson(&mut self) {
        if self.lessons.is_empty() {
            return;
        }
        let next = match self.selected_tab() {
            Some(i) => (i + 1) % self.lessons.len(),
            None => 0,
        };
        self.load_lesson(self.lessons[next].lesson_id);
    }

    pub fn prev_lesson(&mut self) {
        if self.lessons.is_empty() {
            return;
        }
        let prev = match self.selected_tab() {
            Some(0) | None => self.lessons.len() - 1,
            Some(i) => i - 1,
        };
        self.load_lesson(self.lessons[prev].lesson_id);
    }

    /// Reload the selected lesson (retry after an empty or failed load)
    pub fn reload(&mut self) {
        self.reload_lessons();
        self.load_lesson(self.selected_lesson);
    }

    pub fn select_answer(&mut self, index: usize) {
        if self.controller.select_answer(index).is_some() {
            self.snapshot = self.controller.snapshot();
        }
    }

    pub fn continue_after_answer(&mut self) {
        match self.controller.continue_after_answer() {
            NextStep::Advanced(Advance::Completed) => {
                self.flash_message = Some(Flash::Info("Lekcja ukończona!".to_string()));
            }
            NextStep::Advanced(_) | NextStep::Retry | NextStep::NoSelection => {}
        }
        self.snapshot = self.controller.snapshot();
    }

    pub fn restart_lesson(&mut self) {
        self.controller.reset();
        self.snapshot = self.controller.snapshot();
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.snapshot.verdict
    }
}
