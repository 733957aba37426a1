mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fiszki-cli", about = "Lesson flashcard quiz", version)]
struct Cli {
    /// Directory holding the database and config.json (default: local data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Practise a lesson in the interactive quiz
    #[cfg(feature = "tui")]
    Quiz {
        /// Lesson to open (defaults to the configured lesson)
        lesson: Option<i64>,
    },

    /// List lessons and their flashcard counts
    Lessons,

    /// Print the flashcards of a lesson
    Show {
        /// Lesson id
        lesson: i64,
    },

    /// Add a flashcard
    Add {
        /// Lesson the flashcard belongs to
        #[arg(long)]
        lesson: Option<i64>,
        /// Question text
        question: String,
        /// Correct answer
        answer: String,
        /// Wrong answer shown as a choice (up to three)
        #[arg(long = "decoy", value_name = "TEXT")]
        decoys: Vec<String>,
    },

    /// Insert the sample lessons if the store is empty
    Seed,

    /// Delete every flashcard
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
        /// Insert the sample lessons again afterwards
        #[arg(long)]
        reseed: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                let app = app::App::interactive(data_dir)?;
                tui::run(app, None)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                eprintln!("TUI not available (built without 'tui' feature). Use a subcommand.");
                eprintln!("Run with --help for usage.");
                std::process::exit(1);
            }
        }
        #[cfg(feature = "tui")]
        Some(Command::Quiz { lesson }) => {
            let app = app::App::interactive(data_dir)?;
            tui::run(app, lesson)?;
        }
        Some(Command::Lessons) => {
            let app = app::App::new(data_dir)?;
            commands::lessons::run(&app, &cli.format, use_color)?;
        }
        Some(Command::Show { lesson }) => {
            let app = app::App::new(data_dir)?;
            commands::show::run(&app, lesson, &cli.format, use_color)?;
        }
        Some(Command::Add { lesson, question, answer, decoys }) => {
            let app = app::App::new(data_dir)?;
            commands::add::run(&app, lesson, question, answer, decoys, &cli.format)?;
        }
        Some(Command::Seed) => {
            let app = app::App::open(data_dir)?;
            commands::seed::run(&app, &cli.format)?;
        }
        Some(Command::Reset { yes, reseed }) => {
            let app = app::App::open(data_dir)?;
            commands::reset::run(&app, yes, reseed, &cli.format)?;
        }
    }

    Ok(())
}
