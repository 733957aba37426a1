//! SQLite storage for flashcards
//!
//! All flashcards live in a single table:
//! ```text
//! flashcards(id, lesson_id, question, answer, decoy_1, decoy_2, decoy_3)
//! ```
//! The schema version is kept in `PRAGMA user_version`. When it does not match
//! `SCHEMA_VERSION` the table is dropped and recreated; existing cards are lost.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection};
use thiserror::Error;

use super::models::{Flashcard, FlashcardId, LessonId, LessonSummary, NewFlashcard};

/// Bump when the table layout changes
const SCHEMA_VERSION: i64 = 1;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not determine data directory")]
    DataDirNotFound,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Contract of the flashcard store.
///
/// Flashcards are write-once: there is no update and no single delete.
/// Implementations serialize access internally, so a bulk insert or clear
/// is never observed half-done by a concurrent reader.
pub trait FlashcardStore: Send + Sync {
    /// All flashcards of a lesson, ordered by identifier
    fn fetch_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<Flashcard>>;

    /// Append flashcards, returning the identifiers assigned to them
    fn insert_many(&self, flashcards: &[NewFlashcard]) -> Result<Vec<FlashcardId>>;

    /// Total number of flashcards across all lessons
    fn count(&self) -> Result<usize>;

    /// Remove every flashcard
    fn clear_all(&self) -> Result<()>;

    /// Lessons that have at least one flashcard, ordered by lesson id
    fn list_lessons(&self) -> Result<Vec<LessonSummary>>;

    /// Append a single flashcard
    fn insert(&self, flashcard: NewFlashcard) -> Result<FlashcardId> {
        self.insert_many(std::slice::from_ref(&flashcard))?
            .pop()
            .ok_or_else(|| StorageError::Unavailable("insert returned no identifier".to_string()))
    }
}

/// Flashcard store backed by one SQLite connection
pub struct SqliteFlashcardStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteFlashcardStore {
    /// Open (or create) the database at the given path.
    pub fn open(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        Self::with_connection(conn, Some(db_path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, None)
    }

    fn with_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        prepare_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a transaction half
        // applied: uncommitted transactions roll back on drop.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create the table, dropping it first when the stored schema is outdated
fn prepare_schema(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version != 0 && version != SCHEMA_VERSION {
        log::warn!(
            "Flashcard schema version {} does not match {}, recreating table",
            version,
            SCHEMA_VERSION
        );
        conn.execute_batch("DROP TABLE IF EXISTS flashcards;")?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lesson_id INTEGER,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            decoy_1 TEXT,
            decoy_2 TEXT,
            decoy_3 TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_flashcards_lesson_id ON flashcards(lesson_id);
        "#,
    )?;

    if version != SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
    }

    Ok(())
}

fn row_to_flashcard(row: &rusqlite::Row) -> rusqlite::Result<Flashcard> {
    Ok(Flashcard {
        id: row.get(0)?,
        lesson_id: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        decoys: [row.get(4)?, row.get(5)?, row.get(6)?],
    })
}

impl FlashcardStore for SqliteFlashcardStore {
    fn fetch_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<Flashcard>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, lesson_id, question, answer, decoy_1, decoy_2, decoy_3
            FROM flashcards
            WHERE lesson_id = ?1
            ORDER BY id
            "#,
        )?;

        let cards = stmt
            .query_map(params![lesson_id], row_to_flashcard)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn insert_many(&self, flashcards: &[NewFlashcard]) -> Result<Vec<FlashcardId>> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let mut ids = Vec::with_capacity(flashcards.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO flashcards (lesson_id, question, answer, decoy_1, decoy_2, decoy_3) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for card in flashcards {
                let [d1, d2, d3] = &card.decoys;
                stmt.execute(params![card.lesson_id, card.question, card.answer, d1, d2, d3])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM flashcards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn clear_all(&self) -> Result<()> {
        let removed = self.lock().execute("DELETE FROM flashcards", [])?;
        log::info!("Cleared {} flashcards", removed);
        Ok(())
    }

    fn list_lessons(&self) -> Result<Vec<LessonSummary>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT lesson_id, COUNT(*)
            FROM flashcards
            WHERE lesson_id IS NOT NULL
            GROUP BY lesson_id
            ORDER BY lesson_id
            "#,
        )?;

        let lessons = stmt
            .query_map([], |row| {
                Ok(LessonSummary {
                    lesson_id: row.get(0)?,
                    card_count: row.get::<_, i64>(1)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }
}

/// Store that opens its database on first use and retries on every call
/// until the open succeeds.
///
/// Used when the database could not be opened at start-up: every operation
/// fails with the open error, so a session falls back to `Empty` and a later
/// reload picks the database up once it becomes readable.
pub struct DeferredFlashcardStore {
    db_path: PathBuf,
    slot: Mutex<Option<SqliteFlashcardStore>>,
}

impl DeferredFlashcardStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            slot: Mutex::new(None),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn with_store<T>(&self, f: impl FnOnce(&SqliteFlashcardStore) -> Result<T>) -> Result<T> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if slot.is_none() {
            let store = SqliteFlashcardStore::open(self.db_path.clone()).map_err(|e| {
                log::warn!("Database {} still unavailable: {}", self.db_path.display(), e);
                e
            })?;
            log::info!("Opened database {}", self.db_path.display());
            *slot = Some(store);
        }

        match slot.as_ref() {
            Some(store) => f(store),
            None => Err(StorageError::Unavailable("database not open".to_string())),
        }
    }
}

impl FlashcardStore for DeferredFlashcardStore {
    fn fetch_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<Flashcard>> {
        self.with_store(|s| s.fetch_by_lesson(lesson_id))
    }

    fn insert_many(&self, flashcards: &[NewFlashcard]) -> Result<Vec<FlashcardId>> {
        self.with_store(|s| s.insert_many(flashcards))
    }

    fn count(&self) -> Result<usize> {
        self.with_store(|s| s.count())
    }

    fn clear_all(&self) -> Result<()> {
        self.with_store(|s| s.clear_all())
    }

    fn list_lessons(&self) -> Result<Vec<LessonSummary>> {
        self.with_store(|s| s.list_lessons())
    }
}

/// Open the database, falling back to a [`DeferredFlashcardStore`] when it
/// cannot be opened right now. Never fails.
pub fn open_or_deferred(db_path: PathBuf) -> Arc<dyn FlashcardStore> {
    match SqliteFlashcardStore::open(db_path.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::error!("Failed to open database {}: {}", db_path.display(), e);
            Arc::new(DeferredFlashcardStore::new(db_path))
        }
    }
}
