//! Deck statistics.

use crate::types::{Card, DeckStats, LearningState};
use chrono::{DateTime, Utc};

/// Count cards by due status and learning state as of now.
pub fn compute(cards: &[Card]) -> DeckStats {
    compute_at(cards, Utc::now())
}

/// Count cards by due status and learning state. `Relearning` cards have
/// their own bucket and are not counted as learning.
pub fn compute_at(cards: &[Card], now: DateTime<Utc>) -> DeckStats {
    let mut stats = DeckStats {
        total_cards: cards.len(),
        ..Default::default()
    };

    for card in cards {
        if card.is_due(now) {
            stats.due_cards += 1;
        }
        match card.scheduling.state {
            LearningState::New => stats.new_cards += 1,
            LearningState::Learning => stats.learning_cards += 1,
            LearningState::Review => stats.review_cards += 1,
            LearningState::Relearning => stats.relearning_cards += 1,
        }
    }

    stats
}
