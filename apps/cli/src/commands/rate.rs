use anyhow::{Context, Result};
use srs_core::{tools, Fsrs};

use crate::app::App;

/// Rate one card. Relative paths are taken from the working directory, so any
/// card the user can name is accepted, inside the base deck or not.
pub fn run(app: &App, card: &str, rating: i64) -> Result<()> {
    let path = std::env::current_dir()
        .context("failed to read working directory")?
        .join(srs_core::config::expand_user_path(card));

    let response = tools::rate_card_file(Fsrs::default(), &path, rating)?;

    if app.json() {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!(
            "Card rated as {}. Next review: {} ({})",
            rating_name(response.rating),
            response.new_due_date.format("%Y-%m-%d %H:%M UTC"),
            response.new_state
        );
    }

    Ok(())
}

fn rating_name(value: u8) -> &'static str {
    srs_core::Rating::from_value(i64::from(value)).map_or("?", |r| r.as_str())
}
