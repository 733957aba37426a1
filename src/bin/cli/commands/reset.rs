use anyhow::{bail, Context, Result};

use fiszki_lib::flashcards::seed;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, confirmed: bool, reseed: bool, format: &OutputFormat) -> Result<()> {
    let before = app.store.count().context("Failed to count flashcards")?;

    if !confirmed {
        bail!(
            "This deletes all {} flashcards in {}. Pass --yes to confirm.",
            before,
            app.data_dir.display()
        );
    }

    app.store.clear_all().context("Failed to clear flashcards")?;

    let inserted = if reseed {
        seed::ensure_sample_data(app.store.as_ref()).context("Failed to seed flashcards")?
    } else {
        0
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "removed": before,
                "inserted": inserted,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Removed {} flashcards.", before);
            if reseed {
                println!("Inserted {} sample flashcards.", inserted);
            } else if app.config.seed_on_start {
                println!("The sample lessons return on the next start; set \"seedOnStart\": false to keep the store empty.");
            }
        }
    }

    Ok(())
}
