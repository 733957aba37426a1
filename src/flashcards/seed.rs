//! Built-in sample lessons
//!
//! An empty store gets two small Polish→English vocabulary lessons so the
//! first run has something to practise. Seeding never happens once the store
//! holds any flashcard, user-added ones included.

use super::models::{LessonId, NewFlashcard};
use super::storage::{FlashcardStore, Result};

/// Display titles of the built-in lessons
const SAMPLE_LESSONS: &[(LessonId, &str)] = &[(1, "Zwierzęta"), (2, "Powitania")];

/// Title of a built-in lesson, if the id belongs to one
pub fn lesson_title(lesson_id: LessonId) -> Option<&'static str> {
    SAMPLE_LESSONS
        .iter()
        .find(|(id, _)| *id == lesson_id)
        .map(|(_, title)| *title)
}

/// The fixed set of sample flashcards
pub fn sample_flashcards() -> Vec<NewFlashcard> {
    vec![
        NewFlashcard::new(Some(1), "Co oznacza słowo 'kot' po angielsku?", "Cat")
            .with_decoys(["Dog", "Mouse", "Bird"]),
        NewFlashcard::new(Some(1), "Co oznacza słowo 'pies' po angielsku?", "Dog")
            .with_decoys(["Cat", "Fish", "Rabbit"]),
        NewFlashcard::new(Some(1), "Co oznacza słowo 'dom' po angielsku?", "House")
            .with_decoys(["Car", "Tree", "Garden"]),
        NewFlashcard::new(Some(1), "Co oznacza słowo 'książka' po angielsku?", "Book")
            .with_decoys(["Pen", "Paper", "Table"]),
        NewFlashcard::new(Some(1), "Co oznacza słowo 'samochód' po angielsku?", "Car")
            .with_decoys(["Bike", "Bus", "Train"]),
        NewFlashcard::new(Some(2), "Jak powiesz 'cześć' po angielsku?", "Hello")
            .with_decoys(["Goodbye", "Please", "Thank you"]),
        NewFlashcard::new(Some(2), "Jak powiesz 'dziękuję' po angielsku?", "Thank you")
            .with_decoys(["Sorry", "Please", "Excuse me"]),
        NewFlashcard::new(Some(2), "Jak powiesz 'przepraszam' po angielsku?", "Sorry")
            .with_decoys(["Thank you", "Hello", "Goodbye"]),
    ]
}

/// Insert the sample flashcards if the store is empty.
///
/// Returns the number of flashcards inserted, 0 when the store already had data.
pub fn ensure_sample_data(store: &dyn FlashcardStore) -> Result<usize> {
    let count = store.count()?;
    log::debug!("Flashcards in store: {}", count);

    if count > 0 {
        return Ok(0);
    }

    let samples = sample_flashcards();
    store.insert_many(&samples)?;
    log::info!("Store was empty, inserted {} sample flashcards", samples.len());
    Ok(samples.len())
}
