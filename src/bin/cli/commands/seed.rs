use anyhow::{Context, Result};

use fiszki_lib::flashcards::seed;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let inserted = seed::ensure_sample_data(app.store.as_ref()).context("Failed to seed flashcards")?;
    let total = app.store.count().context("Failed to count flashcards")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "inserted": inserted,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if inserted == 0 {
                println!("Store already has {} flashcards, nothing to seed.", total);
            } else {
                println!("Inserted {} sample flashcards.", inserted);
            }
        }
    }

    Ok(())
}
