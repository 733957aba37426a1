//! Flashcard storage for Fiszki
//!
//! This module provides:
//! - Flashcard and lesson data models
//! - SQLite-backed flashcard store (write-once, bulk-clear only)
//! - Built-in sample lessons for an empty first run

pub mod models;
pub mod seed;
pub mod storage;

pub use models::*;
pub use storage::{open_or_deferred, DeferredFlashcardStore, FlashcardStore, SqliteFlashcardStore, StorageError};
