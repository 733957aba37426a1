//! Lesson session state machine
//!
//! ```text
//! Idle ──load──▶ Loading ──ok, cards──▶ Ready ──advance at last card──▶ Completed
//!                   │   └──ok, none / error──▶ Empty
//!                   ▲
//!                   └──────────── load (from any state) ────────────────────┘
//! ```
//!
//! Every load hands out a [`LoadTicket`]. Only the ticket of the most recent
//! load may apply its result, so a slow fetch can never overwrite a newer one.

use serde::Serialize;

use crate::flashcards::{Flashcard, LessonId, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    /// No lesson requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// Flashcards loaded, position valid
    Ready,
    /// Fetch finished with no flashcards (or failed)
    Empty,
    /// `advance` was called on the last flashcard
    Completed,
}

/// Proof of a load request; carries the generation it was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    lesson_id: LessonId,
}

impl LoadTicket {
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }
}

/// Result of applying a finished fetch to the session
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { lesson_id: LessonId, count: usize },
    /// The lesson has no flashcards
    Empty { lesson_id: LessonId },
    /// The fetch failed; the session fell back to `Empty`
    Failed { lesson_id: LessonId, error: StorageError },
    /// A newer load was requested before this one finished; result discarded
    Superseded { lesson_id: LessonId },
}

impl LoadOutcome {
    pub fn lesson_id(&self) -> LessonId {
        match self {
            Self::Loaded { lesson_id, .. }
            | Self::Empty { lesson_id }
            | Self::Failed { lesson_id, .. }
            | Self::Superseded { lesson_id } => *lesson_id,
        }
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Superseded { .. })
    }
}

/// Result of [`LessonSession::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given position
    Moved(usize),
    /// Already at the last flashcard; position unchanged
    Completed,
    /// No lesson is ready
    Ignored,
}

/// In-memory progress through one lesson
#[derive(Debug)]
pub struct LessonSession {
    status: SessionStatus,
    lesson_id: Option<LessonId>,
    flashcards: Vec<Flashcard>,
    position: usize,
    generation: u64,
}

impl Default for LessonSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LessonSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            lesson_id: None,
            flashcards: Vec::new(),
            position: 0,
            generation: 0,
        }
    }

    /// Enter `Loading` for a lesson. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self, lesson_id: LessonId) -> LoadTicket {
        self.generation += 1;
        self.status = SessionStatus::Loading;
        self.lesson_id = Some(lesson_id);
        self.flashcards.clear();
        self.position = 0;

        LoadTicket {
            generation: self.generation,
            lesson_id,
        }
    }

    /// Apply the result of the fetch started with `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Flashcard>, StorageError>,
    ) -> LoadOutcome {
        let lesson_id = ticket.lesson_id;
        if ticket.generation != self.generation {
            return LoadOutcome::Superseded { lesson_id };
        }

        self.position = 0;
        match result {
            Ok(flashcards) if flashcards.is_empty() => {
                self.flashcards = flashcards;
                self.status = SessionStatus::Empty;
                LoadOutcome::Empty { lesson_id }
            }
            Ok(flashcards) => {
                let count = flashcards.len();
                self.flashcards = flashcards;
                self.status = SessionStatus::Ready;
                LoadOutcome::Loaded { lesson_id, count }
            }
            Err(error) => {
                self.flashcards.clear();
                self.status = SessionStatus::Empty;
                LoadOutcome::Failed { lesson_id, error }
            }
        }
    }

    /// Flashcard at the current position while a lesson is ready or completed
    pub fn current_flashcard(&self) -> Option<&Flashcard> {
        match self.status {
            SessionStatus::Ready | SessionStatus::Completed => self.flashcards.get(self.position),
            _ => None,
        }
    }

    pub fn advance(&mut self) -> Advance {
        match self.status {
            SessionStatus::Ready if self.position + 1 < self.flashcards.len() => {
                self.position += 1;
                Advance::Moved(self.position)
            }
            SessionStatus::Ready | SessionStatus::Completed => {
                self.status = SessionStatus::Completed;
                Advance::Completed
            }
            _ => Advance::Ignored,
        }
    }

    /// Back to the first flashcard, without refetching
    pub fn reset(&mut self) {
        self.position = 0;
        if self.status == SessionStatus::Completed {
            self.status = SessionStatus::Ready;
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn lesson_id(&self) -> Option<LessonId> {
        self.lesson_id
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::NewFlashcard;

    fn cards(lesson_id: LessonId, n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| {
                NewFlashcard::new(Some(lesson_id), format!("q{}", i), format!("a{}", i))
                    .into_flashcard(i as i64 + 1)
            })
            .collect()
    }

    fn ready_session(n: usize) -> LessonSession {
        let mut session = LessonSession::new();
        let ticket = session.begin_load(1);
        session.finish_load(ticket, Ok(cards(1, n)));
        session
    }

    #[test]
    fn test_starts_idle() {
        let session = LessonSession::new();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.current_flashcard().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_load_sets_first_card() {
        let mut session = LessonSession::new();
        let ticket = session.begin_load(1);
        assert!(session.is_loading());
        assert!(session.current_flashcard().is_none());

        let outcome = session.finish_load(ticket, Ok(cards(1, 3)));
        assert!(matches!(outcome, LoadOutcome::Loaded { lesson_id: 1, count: 3 }));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.position(), 0);
        assert_eq!(session.current_flashcard().unwrap().question, "q0");
    }

    #[test]
    fn test_empty_lesson() {
        let mut session = LessonSession::new();
        let ticket = session.begin_load(99);
        let outcome = session.finish_load(ticket, Ok(Vec::new()));

        assert!(matches!(outcome, LoadOutcome::Empty { lesson_id: 99 }));
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.current_flashcard().is_none());
    }

    #[test]
    fn test_failed_load_falls_back_to_empty() {
        let mut session = ready_session(2);
        let ticket = session.begin_load(2);
        let outcome =
            session.finish_load(ticket, Err(StorageError::Unavailable("disk gone".to_string())));

        assert!(matches!(outcome, LoadOutcome::Failed { lesson_id: 2, .. }));
        assert_eq!(session.status(), SessionStatus::Empty);
        assert!(session.is_empty());
        assert!(session.current_flashcard().is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut session = LessonSession::new();
        let first = session.begin_load(1);
        let second = session.begin_load(2);

        let outcome = session.finish_load(second, Ok(cards(2, 2)));
        assert!(outcome.is_applied());

        let late = session.finish_load(first, Ok(cards(1, 5)));
        assert!(matches!(late, LoadOutcome::Superseded { lesson_id: 1 }));
        assert_eq!(session.lesson_id(), Some(2));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_stale_ticket_does_not_end_newer_loading() {
        let mut session = LessonSession::new();
        let first = session.begin_load(1);
        let _second = session.begin_load(2);

        session.finish_load(first, Ok(cards(1, 5)));
        assert!(session.is_loading());
        assert_eq!(session.lesson_id(), Some(2));
    }

    #[test]
    fn test_advance_increments_by_one() {
        let mut session = ready_session(3);
        assert_eq!(session.advance(), Advance::Moved(1));
        assert_eq!(session.position(), 1);
        assert_eq!(session.current_flashcard().unwrap().question, "q1");
    }

    #[test]
    fn test_advance_at_last_card_plateaus() {
        let mut session = ready_session(2);
        session.advance();
        assert_eq!(session.position(), 1);

        assert_eq!(session.advance(), Advance::Completed);
        assert_eq!(session.position(), 1);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.current_flashcard().unwrap().question, "q1");

        assert_eq!(session.advance(), Advance::Completed);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn test_advance_ignored_when_not_ready() {
        let mut session = LessonSession::new();
        assert_eq!(session.advance(), Advance::Ignored);

        session.begin_load(1);
        assert_eq!(session.advance(), Advance::Ignored);
        assert_eq!(session.position(), 0);
    }

    #[test]
    fn test_reset_returns_to_first_card() {
        let mut session = ready_session(2);
        session.advance();
        session.advance();
        assert_eq!(session.status(), SessionStatus::Completed);

        session.reset();
        assert_eq!(session.position(), 0);
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.current_flashcard().unwrap().question, "q0");
    }
}
