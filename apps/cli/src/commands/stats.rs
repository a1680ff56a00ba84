use anyhow::Result;
use srs_core::tools;

use crate::app::App;

pub fn run(app: &App, deck: Option<&str>) -> Result<()> {
    let response = tools::get_deck_stats(&app.config, deck)?;

    if app.json() {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    for warning in &response.warnings {
        eprintln!("Warning: {warning}");
    }

    let stats = &response.stats;
    if stats.total_cards == 0 {
        println!("No cards found in {}", response.deck_path.display());
        return Ok(());
    }

    println!("Deck statistics for {}:\n", response.deck_path.display());
    println!("Total cards:    {}", stats.total_cards);
    println!("Due cards:      {}", stats.due_cards);
    println!("New cards:      {}", stats.new_cards);
    println!("Learning cards: {}", stats.learning_cards);
    println!("Review cards:   {}", stats.review_cards);
    println!("Relearning:     {}", stats.relearning_cards);

    Ok(())
}
