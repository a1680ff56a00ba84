use anyhow::Result;
use chrono::Utc;
use srs_core::tools::ListDecksResponse;
use srs_core::{repository, stats};

use crate::app::App;
use crate::render::tree;

pub fn run(app: &App, deck: Option<&str>) -> Result<()> {
    let deck_path = app.deck_path(deck)?;
    let now = Utc::now();

    if app.json() {
        let (decks, warnings) = repository::deck_tree(&deck_path, now);
        let response = ListDecksResponse {
            base_path: deck_path,
            decks,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let scan = repository::enumerate(&deck_path);
    app.report(&scan.warnings);

    let totals = stats::compute_at(&scan.cards, now);
    println!("Deck: {}", deck_path.display());
    println!(
        "Cards: {} total, {} due | {} new, {} learning, {} review, {} relearning\n",
        totals.total_cards,
        totals.due_cards,
        totals.new_cards,
        totals.learning_cards,
        totals.review_cards,
        totals.relearning_cards
    );

    if scan.cards.is_empty() {
        println!("No cards found in this deck.");
        return Ok(());
    }

    for line in tree::render(&deck_path, &scan.cards, now, app.use_color) {
        println!("{line}");
    }

    Ok(())
}
