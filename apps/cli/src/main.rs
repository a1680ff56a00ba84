mod app;
mod commands;
mod render;

use clap::{Parser, Subcommand};
use std::io::IsTerminal;

#[derive(Parser)]
#[command(name = "srs", about = "Spaced repetition over markdown flashcards", version)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Review the cards that are due in a deck
    Review {
        /// Deck directory, relative to the base deck (default: the base deck)
        deck: Option<String>,
    },

    /// Rate a single card file
    Rate {
        /// Path to the card file
        card: String,
        /// 1=Again 2=Hard 3=Good 4=Easy
        #[arg(allow_negative_numbers = true)]
        rating: i64,
    },

    /// Show the deck tree with due hints
    List {
        deck: Option<String>,
    },

    /// Show card counts by state
    Stats {
        deck: Option<String>,
    },

    /// Print the number of due cards
    Due {
        deck: Option<String>,
    },

    /// Show or change the configuration
    Config {
        /// Root directory for all decks
        #[arg(long)]
        base_deck: Option<String>,
        /// Editor command used by `review`
        #[arg(long)]
        editor: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    match cli.command {
        Command::Config { base_deck, editor } => {
            commands::config::run(base_deck.as_deref(), editor.as_deref(), cli.format)?;
        }
        Command::Review { deck } => {
            let app = app::App::new(cli.format, use_color)?;
            commands::review::run(&app, deck.as_deref())?;
        }
        Command::Rate { card, rating } => {
            let app = app::App::new(cli.format, use_color)?;
            commands::rate::run(&app, &card, rating)?;
        }
        Command::List { deck } => {
            let app = app::App::new(cli.format, use_color)?;
            commands::list::run(&app, deck.as_deref())?;
        }
        Command::Stats { deck } => {
            let app = app::App::new(cli.format, use_color)?;
            commands::stats::run(&app, deck.as_deref())?;
        }
        Command::Due { deck } => {
            let app = app::App::new(cli.format, use_color)?;
            commands::due::run(&app, deck.as_deref())?;
        }
    }

    Ok(())
}
