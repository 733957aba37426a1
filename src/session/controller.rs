//! Async owner of a lesson session
//!
//! The controller combines a [`LessonSession`] with an [`AnswerPresenter`],
//! runs store fetches on the blocking pool and publishes a
//! [`SessionSnapshot`] after every change. Presentation layers either poll
//! [`LessonController::snapshot`] or watch [`LessonController::subscribe`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

use crate::flashcards::{Flashcard, FlashcardStore, LessonId, StorageError};

use super::presenter::{AnswerChoice, AnswerPresenter, Verdict};
use super::state::{Advance, LessonSession, LoadOutcome, SessionStatus};

/// Observable state of the session at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub lesson_id: Option<LessonId>,
    pub position: usize,
    pub total: usize,
    pub flashcard: Option<Flashcard>,
    pub choices: Vec<AnswerChoice>,
    pub selected: Option<usize>,
    pub verdict: Option<Verdict>,
}

impl SessionSnapshot {
    fn idle() -> Self {
        Self {
            status: SessionStatus::Idle,
            lesson_id: None,
            position: 0,
            total: 0,
            flashcard: None,
            choices: Vec::new(),
            selected: None,
            verdict: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Flashcards after the current one
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.position + 1)
    }
}

/// What happened after the user confirmed their answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// The answer was correct; the session advanced
    Advanced(Advance),
    /// The answer was wrong; same flashcard, selection cleared
    Retry,
    /// Nothing was selected
    NoSelection,
}

struct Inner {
    session: LessonSession,
    presenter: AnswerPresenter,
}

pub struct LessonController {
    store: Arc<dyn FlashcardStore>,
    inner: Mutex<Inner>,
    updates: watch::Sender<SessionSnapshot>,
}

impl LessonController {
    pub fn new(store: Arc<dyn FlashcardStore>, presenter: AnswerPresenter) -> Self {
        let (updates, _) = watch::channel(SessionSnapshot::idle());
        Self {
            store,
            inner: Mutex::new(Inner {
                session: LessonSession::new(),
                presenter,
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build a snapshot from `inner` and send it to subscribers
    fn publish(&self, inner: &mut Inner) -> SessionSnapshot {
        let Inner { session, presenter } = inner;

        let flashcard = session.current_flashcard().cloned();
        let choices = match &flashcard {
            Some(card) => presenter.present(card).to_vec(),
            None => Vec::new(),
        };

        let snapshot = SessionSnapshot {
            status: session.status(),
            lesson_id: session.lesson_id(),
            position: session.position(),
            total: session.len(),
            flashcard,
            choices,
            selected: presenter.selected(),
            verdict: presenter.verdict(),
        };

        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Load a lesson. Never fails: storage errors end in `Empty` and are
    /// returned as [`LoadOutcome::Failed`] for diagnostics.
    pub async fn load_lesson(&self, lesson_id: LessonId) -> LoadOutcome {
        let ticket = {
            let mut inner = self.lock();
            let ticket = inner.session.begin_load(lesson_id);
            self.publish(&mut inner);
            ticket
        };
        log::info!("Loading lesson {}", lesson_id);

        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || store.fetch_by_lesson(lesson_id))
            .await
            .unwrap_or_else(|e| Err(StorageError::Unavailable(format!("fetch task failed: {}", e))));

        let outcome = {
            let mut inner = self.lock();
            let outcome = inner.session.finish_load(ticket, result);
            if outcome.is_applied() {
                inner.presenter.invalidate();
                self.publish(&mut inner);
            }
            outcome
        };

        match &outcome {
            LoadOutcome::Loaded { count, .. } => {
                log::info!("Loaded {} flashcards for lesson {}", count, lesson_id)
            }
            LoadOutcome::Empty { .. } => log::warn!("No flashcards for lesson {}", lesson_id),
            LoadOutcome::Failed { error, .. } => {
                log::error!("Failed to load lesson {}: {}", lesson_id, error)
            }
            LoadOutcome::Superseded { .. } => {
                log::debug!("Discarded result for lesson {}, a newer load was requested", lesson_id)
            }
        }

        outcome
    }

    pub fn current_flashcard(&self) -> Option<Flashcard> {
        self.lock().session.current_flashcard().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().session.is_loading()
    }

    /// Choose an answer of the current flashcard. Rejected while loading,
    /// without a current flashcard, or when a choice is already selected.
    pub fn select_answer(&self, index: usize) -> Option<Verdict> {
        let mut inner = self.lock();
        let card = inner.session.current_flashcard()?.clone();
        if inner.session.status() != SessionStatus::Ready {
            return None;
        }

        inner.presenter.present(&card);
        let verdict = inner.presenter.select(index)?;
        log::debug!("Flashcard {}: answer {} is {:?}", card.id, index, verdict);
        self.publish(&mut inner);
        Some(verdict)
    }

    /// Act on the current selection: advance when correct, unlock for a
    /// retry when wrong.
    pub fn continue_after_answer(&self) -> NextStep {
        let mut inner = self.lock();
        let step = match inner.presenter.verdict() {
            Some(Verdict::Correct) => {
                inner.presenter.clear_selection();
                NextStep::Advanced(Self::advance_session(&mut inner.session))
            }
            Some(Verdict::Incorrect) => {
                inner.presenter.clear_selection();
                NextStep::Retry
            }
            None => NextStep::NoSelection,
        };
        self.publish(&mut inner);
        step
    }

    pub fn advance(&self) -> Advance {
        let mut inner = self.lock();
        inner.presenter.clear_selection();
        let advance = Self::advance_session(&mut inner.session);
        self.publish(&mut inner);
        advance
    }

    fn advance_session(session: &mut LessonSession) -> Advance {
        let advance = session.advance();
        match advance {
            Advance::Moved(position) => log::debug!("Moved to flashcard {}", position),
            Advance::Completed => log::info!("Lesson {:?} complete", session.lesson_id()),
            Advance::Ignored => {}
        }
        advance
    }

    /// Back to the first flashcard of the loaded lesson
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.session.reset();
        inner.presenter.clear_selection();
        self.publish(&mut inner);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::flashcards::seed::ensure_sample_data;
    use crate::flashcards::{FlashcardId, LessonSummary, NewFlashcard, SqliteFlashcardStore};
    use crate::session::presenter::DEFAULT_PLACEHOLDER;

    fn seeded_controller() -> LessonController {
        let store = SqliteFlashcardStore::open_in_memory().unwrap();
        ensure_sample_data(&store).unwrap();
        controller_for(Arc::new(store))
    }

    fn controller_for(store: Arc<dyn FlashcardStore>) -> LessonController {
        let presenter = AnswerPresenter::with_rng(DEFAULT_PLACEHOLDER, StdRng::seed_from_u64(5));
        LessonController::new(store, presenter)
    }

    fn choice_index(snapshot: &SessionSnapshot, correct: bool) -> usize {
        snapshot
            .choices
            .iter()
            .position(|c| c.is_correct == correct)
            .unwrap()
    }

    /// Store whose fetches always fail
    struct BrokenStore;

    impl FlashcardStore for BrokenStore {
        fn fetch_by_lesson(&self, _: LessonId) -> crate::flashcards::storage::Result<Vec<Flashcard>> {
            Err(StorageError::Unavailable("database is locked".to_string()))
        }
        fn insert_many(&self, _: &[NewFlashcard]) -> crate::flashcards::storage::Result<Vec<FlashcardId>> {
            Err(StorageError::Unavailable("database is locked".to_string()))
        }
        fn count(&self) -> crate::flashcards::storage::Result<usize> {
            Ok(0)
        }
        fn clear_all(&self) -> crate::flashcards::storage::Result<()> {
            Ok(())
        }
        fn list_lessons(&self) -> crate::flashcards::storage::Result<Vec<LessonSummary>> {
            Ok(Vec::new())
        }
    }

    /// Store that holds fetches of one lesson until released
    struct GatedStore {
        inner: SqliteFlashcardStore,
        gated_lesson: LessonId,
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl FlashcardStore for GatedStore {
        fn fetch_by_lesson(&self, lesson_id: LessonId) -> crate::flashcards::storage::Result<Vec<Flashcard>> {
            if lesson_id == self.gated_lesson {
                let _ = self.gate.lock().unwrap().recv();
            }
            self.inner.fetch_by_lesson(lesson_id)
        }
        fn insert_many(&self, cards: &[NewFlashcard]) -> crate::flashcards::storage::Result<Vec<FlashcardId>> {
            self.inner.insert_many(cards)
        }
        fn count(&self) -> crate::flashcards::storage::Result<usize> {
            self.inner.count()
        }
        fn clear_all(&self) -> crate::flashcards::storage::Result<()> {
            self.inner.clear_all()
        }
        fn list_lessons(&self) -> crate::flashcards::storage::Result<Vec<LessonSummary>> {
            self.inner.list_lessons()
        }
    }

    /// Store whose first fetch fails; later fetches reach the database
    struct FlakyStore {
        inner: SqliteFlashcardStore,
        fetches: AtomicUsize,
    }

    impl FlashcardStore for FlakyStore {
        fn fetch_by_lesson(&self, lesson_id: LessonId) -> crate::flashcards::storage::Result<Vec<Flashcard>> {
            if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(StorageError::Unavailable("database is locked".to_string()));
            }
            self.inner.fetch_by_lesson(lesson_id)
        }
        fn insert_many(&self, cards: &[NewFlashcard]) -> crate::flashcards::storage::Result<Vec<FlashcardId>> {
            self.inner.insert_many(cards)
        }
        fn count(&self) -> crate::flashcards::storage::Result<usize> {
            self.inner.count()
        }
        fn clear_all(&self) -> crate::flashcards::storage::Result<()> {
            self.inner.clear_all()
        }
        fn list_lessons(&self) -> crate::flashcards::storage::Result<Vec<LessonSummary>> {
            self.inner.list_lessons()
        }
    }

    #[tokio::test]
    async fn test_reload_recovers_after_failure() {
        let inner = SqliteFlashcardStore::open_in_memory().unwrap();
        ensure_sample_data(&inner).unwrap();
        let controller = controller_for(Arc::new(FlakyStore {
            inner,
            fetches: AtomicUsize::new(0),
        }));

        let failed = controller.load_lesson(1).await;
        assert!(matches!(failed, LoadOutcome::Failed { lesson_id: 1, .. }));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Empty);
        assert!(snapshot.choices.is_empty());
        assert!(controller.current_flashcard().is_none());

        let retried = controller.load_lesson(1).await;
        assert!(matches!(retried, LoadOutcome::Loaded { lesson_id: 1, count: 5 }));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.selected, None);
        let card = snapshot.flashcard.clone().unwrap();
        assert_eq!(card.question, "Co oznacza słowo 'kot' po angielsku?");
        assert_eq!(snapshot.choices.len(), 4);
        assert_eq!(snapshot.choices[choice_index(&snapshot, true)].text, "Cat");
    }

    #[tokio::test]
    async fn test_reload_clears_selection() {
        let controller = seeded_controller();
        controller.load_lesson(1).await;
        let wrong = choice_index(&controller.snapshot(), false);
        controller.select_answer(wrong);

        controller.load_lesson(1).await;
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.selected, None);
        assert_eq!(snapshot.verdict, None);
        assert_eq!(snapshot.choices.iter().filter(|c| c.is_correct).count(), 1);
    }

    #[tokio::test]
    async fn test_load_lesson_shows_first_card() {
        let controller = seeded_controller();
        let outcome = controller.load_lesson(1).await;

        assert!(matches!(outcome, LoadOutcome::Loaded { lesson_id: 1, count: 5 }));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.total, 5);
        assert_eq!(
            controller.current_flashcard().unwrap().question,
            "Co oznacza słowo 'kot' po angielsku?"
        );
        assert_eq!(snapshot.choices.len(), 4);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_correct_answer_advances() {
        let controller = seeded_controller();
        controller.load_lesson(1).await;

        let snapshot = controller.snapshot();
        let right = choice_index(&snapshot, true);
        assert_eq!(snapshot.choices[right].text, "Cat");

        assert_eq!(controller.select_answer(right), Some(Verdict::Correct));
        assert_eq!(controller.continue_after_answer(), NextStep::Advanced(Advance::Moved(1)));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.position, 1);
        assert_eq!(snapshot.selected, None);
        assert_eq!(
            snapshot.flashcard.unwrap().question,
            "Co oznacza słowo 'pies' po angielsku?"
        );
    }

    #[tokio::test]
    async fn test_wrong_answer_locks_then_retries() {
        let controller = seeded_controller();
        controller.load_lesson(1).await;
        let before = controller.snapshot();
        let wrong = choice_index(&before, false);
        let right = choice_index(&before, true);

        assert_eq!(controller.select_answer(wrong), Some(Verdict::Incorrect));
        assert_eq!(controller.select_answer(right), None);
        let locked = controller.snapshot();
        assert_eq!(locked.selected, Some(wrong));
        assert_eq!(locked.verdict, Some(Verdict::Incorrect));

        assert_eq!(controller.continue_after_answer(), NextStep::Retry);
        let after = controller.snapshot();
        assert_eq!(after.position, 0);
        assert_eq!(after.flashcard, before.flashcard);
        assert_eq!(after.choices, before.choices);
        assert_eq!(after.selected, None);
    }

    #[tokio::test]
    async fn test_continue_without_selection() {
        let controller = seeded_controller();
        controller.load_lesson(2).await;
        assert_eq!(controller.continue_after_answer(), NextStep::NoSelection);
        assert_eq!(controller.snapshot().position, 0);
    }

    #[tokio::test]
    async fn test_missing_lesson_is_empty() {
        let controller = seeded_controller();
        let outcome = controller.load_lesson(99).await;

        assert!(matches!(outcome, LoadOutcome::Empty { lesson_id: 99 }));
        assert_eq!(controller.snapshot().status, SessionStatus::Empty);
        assert!(controller.current_flashcard().is_none());
        assert_eq!(controller.select_answer(0), None);
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_fatal() {
        let controller = controller_for(Arc::new(BrokenStore));
        let outcome = controller.load_lesson(1).await;

        assert!(matches!(outcome, LoadOutcome::Failed { lesson_id: 1, .. }));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Empty);
        assert!(snapshot.flashcard.is_none());
    }

    #[tokio::test]
    async fn test_completion_and_reset() {
        let controller = seeded_controller();
        controller.load_lesson(2).await;

        assert_eq!(controller.advance(), Advance::Moved(1));
        assert_eq!(controller.advance(), Advance::Moved(2));
        assert_eq!(controller.advance(), Advance::Completed);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Completed);
        assert_eq!(snapshot.position, 2);
        assert_eq!(snapshot.remaining(), 0);

        controller.reset();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Ready);
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.remaining(), 2);
    }

    #[tokio::test]
    async fn test_selection_rejected_after_completion() {
        let controller = seeded_controller();
        controller.load_lesson(2).await;
        controller.advance();
        controller.advance();
        controller.advance();
        assert_eq!(controller.select_answer(0), None);
    }

    #[tokio::test]
    async fn test_choices_stable_across_snapshots() {
        let controller = seeded_controller();
        controller.load_lesson(1).await;
        let first = controller.snapshot().choices;

        controller.advance();
        controller.reset();
        assert_eq!(controller.snapshot().choices, first);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let controller = seeded_controller();
        let mut updates = controller.subscribe();

        controller.load_lesson(1).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().lesson_id, Some(1));

        controller.advance();
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().position, 1);
    }

    #[tokio::test]
    async fn test_last_requested_lesson_wins() {
        let inner = SqliteFlashcardStore::open_in_memory().unwrap();
        ensure_sample_data(&inner).unwrap();
        let (release, gate) = mpsc::channel();
        let store = GatedStore {
            inner,
            gated_lesson: 1,
            gate: Mutex::new(gate),
        };
        let controller = Arc::new(controller_for(Arc::new(store)));
        let mut updates = controller.subscribe();

        let slow = tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.load_lesson(1).await }
        });
        updates
            .wait_for(|s| s.lesson_id == Some(1) && s.is_loading())
            .await
            .unwrap();

        let fast = controller.load_lesson(2).await;
        assert!(matches!(fast, LoadOutcome::Loaded { lesson_id: 2, count: 3 }));

        release.send(()).unwrap();
        let late = slow.await.unwrap();
        assert!(matches!(late, LoadOutcome::Superseded { lesson_id: 1 }));

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.lesson_id, Some(2));
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.flashcard.unwrap().question, "Jak powiesz 'cześć' po angielsku?");
    }
}
