//! Data models for the flashcard store

use serde::{Deserialize, Serialize};

/// Identifier assigned by the store on insert
pub type FlashcardId = i64;

/// Grouping key selecting a lesson
pub type LessonId = i64;

/// Maximum number of decoy answers a flashcard carries
pub const MAX_DECOYS: usize = 3;

/// A stored flashcard: one question, one correct answer and up to three decoys.
///
/// Flashcards are immutable once created. The store never updates or deletes
/// a single card; the only removal is a bulk clear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: FlashcardId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<LessonId>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub decoys: [Option<String>; MAX_DECOYS],
}

impl Flashcard {
    /// Decoys that are actually present, in slot order
    pub fn present_decoys(&self) -> impl Iterator<Item = &str> {
        self.decoys.iter().filter_map(|d| d.as_deref())
    }
}

/// A flashcard that has not been stored yet (no identifier)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<LessonId>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub decoys: [Option<String>; MAX_DECOYS],
}

impl NewFlashcard {
    pub fn new(lesson_id: Option<LessonId>, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            lesson_id,
            question: question.into(),
            answer: answer.into(),
            decoys: [None, None, None],
        }
    }

    /// Fill decoy slots in order. Extra decoys beyond `MAX_DECOYS` are ignored.
    pub fn with_decoys<I, S>(mut self, decoys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (slot, decoy) in self.decoys.iter_mut().zip(decoys) {
            *slot = Some(decoy.into());
        }
        self
    }

    /// Attach the identifier assigned by the store
    pub fn into_flashcard(self, id: FlashcardId) -> Flashcard {
        Flashcard {
            id,
            lesson_id: self.lesson_id,
            question: self.question,
            answer: self.answer,
            decoys: self.decoys,
        }
    }
}

/// Number of flashcards stored for one lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub lesson_id: LessonId,
    pub card_count: usize,
}
