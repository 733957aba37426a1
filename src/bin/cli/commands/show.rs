use anyhow::Result;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, lesson_id: i64, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.lesson_flashcards(lesson_id)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Plain => {
            let label = App::lesson_label(lesson_id);
            if use_color {
                println!("{}{}{}", terminal::Color::BOLD, label, terminal::Color::RESET);
            } else {
                println!("{}", label);
            }

            if cards.is_empty() {
                println!("No flashcards in this lesson.");
                return Ok(());
            }

            for (i, card) in cards.iter().enumerate() {
                println!();
                println!(
                    "{}",
                    terminal::render_flashcard(card, i + 1, &app.config.answer_placeholder, use_color)
                );
            }
        }
    }

    Ok(())
}
