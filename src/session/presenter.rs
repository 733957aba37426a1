//! Shuffled answer choices for the current flashcard
//!
//! The order is drawn once per flashcard id and cached, so redrawing the
//! screen never reshuffles. The cache is dropped when a new lesson is loaded.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::flashcards::{Flashcard, FlashcardId};

/// Text shown in place of a missing decoy
pub const DEFAULT_PLACEHOLDER: &str = "Brak odpowiedzi";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerChoice {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

pub struct AnswerPresenter {
    placeholder: String,
    rng: StdRng,
    shuffles: HashMap<FlashcardId, Vec<AnswerChoice>>,
    presented: Option<FlashcardId>,
    selected: Option<usize>,
}

impl AnswerPresenter {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self::with_rng(placeholder, StdRng::from_entropy())
    }

    /// Presenter with a fixed random source
    pub fn with_rng(placeholder: impl Into<String>, rng: StdRng) -> Self {
        Self {
            placeholder: placeholder.into(),
            rng,
            shuffles: HashMap::new(),
            presented: None,
            selected: None,
        }
    }

    /// Choices for `flashcard`, in their cached display order.
    ///
    /// Presenting a different flashcard than last time clears the selection.
    pub fn present(&mut self, flashcard: &Flashcard) -> &[AnswerChoice] {
        if self.presented != Some(flashcard.id) {
            self.presented = Some(flashcard.id);
            self.selected = None;
        }

        let placeholder = &self.placeholder;
        let rng = &mut self.rng;
        self.shuffles
            .entry(flashcard.id)
            .or_insert_with(|| shuffled_choices(flashcard, placeholder, rng))
    }

    /// Select a choice of the presented flashcard.
    ///
    /// Returns `None` when nothing is presented, the index is out of range, or a
    /// choice is already selected (choices stay locked until cleared).
    pub fn select(&mut self, index: usize) -> Option<Verdict> {
        if self.selected.is_some() {
            return None;
        }

        let id = self.presented?;
        let choice = self.shuffles.get(&id)?.get(index)?;
        self.selected = Some(index);

        Some(if choice.is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        })
    }

    /// Unlock the choices of the presented flashcard
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    /// Verdict of the current selection, if any
    pub fn verdict(&self) -> Option<Verdict> {
        let index = self.selected?;
        let choice = self.shuffles.get(&self.presented?)?.get(index)?;
        Some(if choice.is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        })
    }

    /// Forget every cached order and the selection
    pub fn invalidate(&mut self) {
        self.shuffles.clear();
        self.presented = None;
        self.selected = None;
    }
}

fn shuffled_choices(flashcard: &Flashcard, placeholder: &str, rng: &mut StdRng) -> Vec<AnswerChoice> {
    let mut choices = Vec::with_capacity(flashcard.decoys.len() + 1);
    choices.push(AnswerChoice {
        text: flashcard.answer.clone(),
        is_correct: true,
    });
    for decoy in &flashcard.decoys {
        choices.push(AnswerChoice {
            text: decoy.clone().unwrap_or_else(|| placeholder.to_string()),
            is_correct: false,
        });
    }

    choices.shuffle(rng);
    choices
}
