use anyhow::Result;

use crate::app::App;
use crate::render::terminal::Color;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let lessons = app.list_lessons()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = lessons
                .iter()
                .map(|lesson| {
                    serde_json::json!({
                        "lessonId": lesson.lesson_id,
                        "title": fiszki_lib::flashcards::seed::lesson_title(lesson.lesson_id),
                        "cardCount": lesson.card_count,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if lessons.is_empty() {
                println!("No lessons found. Run `fiszki-cli seed` to add the sample lessons.");
                return Ok(());
            }

            let labels: Vec<String> = lessons.iter().map(|l| App::lesson_label(l.lesson_id)).collect();
            let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(6).max(6);

            for (lesson, label) in lessons.iter().zip(&labels) {
                let current = if lesson.lesson_id == app.config.default_lesson { "* " } else { "  " };
                let padding = " ".repeat(width - label.chars().count());
                let count = format!("{} cards", lesson.card_count);
                if use_color {
                    println!("{}{}{} {}{}{}", current, label, padding, Color::DIM, count, Color::RESET);
                } else {
                    println!("{}{}{} {}", current, label, padding, count);
                }
            }

            let total: usize = lessons.iter().map(|l| l.card_count).sum();
            println!("\n{} lessons, {} flashcards total", lessons.len(), total);
        }
    }

    Ok(())
}
