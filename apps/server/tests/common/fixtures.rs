//! Card file fixtures.

/// A card that has never been reviewed.
pub const NEW_CARD: &str = "What is the capital of France?\n---\nParis";

/// A graduated card due at `due`.
pub fn review_card(due: &str) -> String {
    card_with_metadata(due, "Review", 3, 12.5, 4.2)
}

/// A card in its learning steps due at `due`.
pub fn learning_card(due: &str) -> String {
    card_with_metadata(due, "Learning", 1, 0.4, 6.0)
}

fn card_with_metadata(due: &str, state: &str, reps: u64, stability: f64, difficulty: f64) -> String {
    format!(
        "<!-- FSRS: due:{due}, stability:{stability:.2}, difficulty:{difficulty:.2}, elapsed_days:0, scheduled_days:0, reps:{reps}, lapses:0, state:{state} -->\n\
         Question for {state}\n---\nAnswer for {state}"
    )
}
