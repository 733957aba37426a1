pub mod config;
pub mod flashcards;
pub mod session;

pub use config::AppConfig;
pub use flashcards::{Flashcard, FlashcardStore, LessonId, NewFlashcard, SqliteFlashcardStore, StorageError};
pub use session::{LessonController, LessonSession, SessionSnapshot, SessionStatus};
