use anyhow::{bail, Context, Result};

use fiszki_lib::flashcards::MAX_DECOYS;
use fiszki_lib::NewFlashcard;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    lesson_id: Option<i64>,
    question: String,
    answer: String,
    decoys: Vec<String>,
    format: &OutputFormat,
) -> Result<()> {
    let question = question.trim().to_string();
    let answer = answer.trim().to_string();

    if question.is_empty() || answer.is_empty() {
        bail!("Question and answer cannot be empty");
    }
    if decoys.len() > MAX_DECOYS {
        bail!("A flashcard takes at most {} decoys, got {}", MAX_DECOYS, decoys.len());
    }

    let decoys: Vec<String> = decoys
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    if decoys.iter().any(|d| *d == answer) {
        bail!("A decoy cannot repeat the correct answer '{}'", answer);
    }

    let card = NewFlashcard::new(lesson_id, question, answer).with_decoys(decoys);
    let id = app.store.insert(card.clone()).context("Failed to add flashcard")?;
    log::info!("Added flashcard {} to lesson {:?}", id, lesson_id);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card.into_flashcard(id))?);
        }
        OutputFormat::Plain => match lesson_id {
            Some(lesson) => println!("Added flashcard #{} to {}", id, App::lesson_label(lesson)),
            None => println!("Added flashcard #{} (no lesson)", id),
        },
    }

    Ok(())
}
