//! Lesson sessions: progress through one lesson and the answers shown for
//! the current flashcard.

pub mod controller;
pub mod presenter;
pub mod state;

pub use controller::{LessonController, NextStep, SessionSnapshot};
pub use presenter::{AnswerChoice, AnswerPresenter, Verdict, DEFAULT_PLACEHOLDER};
pub use state::{Advance, LessonSession, LoadOutcome, LoadTicket, SessionStatus};
