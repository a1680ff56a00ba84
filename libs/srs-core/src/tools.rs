//! Tool-call operations over a configured deck directory.
//!
//! These are the entry points shared by the HTTP server and the CLI. Each one
//! resolves its paths through a [`Config`] and returns a serializable response.

use crate::algorithm::Scheduler;
use crate::codec;
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::repository::{self, ScanWarning, ROOT_DECK};
use crate::session::ReviewSession;
use crate::stats;
use crate::types::{DeckStats, LearningState, Rating};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct DueCard {
    pub file_path: PathBuf,
    pub question: String,
    pub answer: String,
    pub due: DateTime<Utc>,
    pub state: LearningState,
    pub reps: u64,
    pub difficulty: f64,
    pub stability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DueCardsResponse {
    pub deck_path: PathBuf,
    pub total_cards: usize,
    pub due_count: usize,
    pub due_cards: Vec<DueCard>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RateCardResponse {
    pub success: bool,
    pub file_path: PathBuf,
    pub rating: u8,
    pub new_due_date: DateTime<Utc>,
    pub new_state: LearningState,
    pub reps: u64,
    pub difficulty: f64,
    pub stability: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckStatsResponse {
    pub deck_path: PathBuf,
    #[serde(flatten)]
    pub stats: DeckStats,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDecksResponse {
    pub base_path: PathBuf,
    pub decks: BTreeMap<String, DeckStats>,
    pub warnings: Vec<String>,
}

/// Cards in a deck (recursively) that are due now.
pub fn get_due_cards(config: &Config, deck: Option<&str>) -> Result<DueCardsResponse> {
    get_due_cards_at(config, deck, Utc::now())
}

pub fn get_due_cards_at(
    config: &Config,
    deck: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DueCardsResponse> {
    let deck_path = existing_deck(config, deck)?;
    let scan = repository::enumerate(&deck_path);

    let due_cards: Vec<DueCard> = repository::due_cards(&scan.cards, now)
        .into_iter()
        .map(|card| DueCard {
            file_path: card.path,
            question: card.question,
            answer: card.answer,
            due: card.scheduling.due,
            state: card.scheduling.state,
            reps: card.scheduling.reps,
            difficulty: card.scheduling.difficulty,
            stability: card.scheduling.stability,
        })
        .collect();

    Ok(DueCardsResponse {
        deck_path,
        total_cards: scan.cards.len(),
        due_count: due_cards.len(),
        due_cards,
        warnings: messages(&scan.warnings),
    })
}

/// Apply a 1-4 rating to a card in the base deck and persist the new state.
///
/// The rating and path are validated before the file is touched, so bad input
/// never modifies anything on disk. Paths that leave the base deck or do not
/// name a `.md` card are rejected.
pub fn rate_card<S: Scheduler>(
    config: &Config,
    scheduler: S,
    file_path: &str,
    rating: i64,
) -> Result<RateCardResponse> {
    if file_path.trim().is_empty() {
        return Err(CoreError::MissingArgument("file_path"));
    }
    let rating = Rating::try_from(rating)?;
    let path = config.resolve_card_path(file_path.trim())?;
    rate(scheduler, path, rating)
}

/// Rate a card file named directly by the user, without deck containment.
pub fn rate_card_file<S: Scheduler>(scheduler: S, path: &Path, rating: i64) -> Result<RateCardResponse> {
    let rating = Rating::try_from(rating)?;
    rate(scheduler, path.to_path_buf(), rating)
}

fn rate<S: Scheduler>(scheduler: S, path: PathBuf, rating: Rating) -> Result<RateCardResponse> {
    let is_card = path
        .file_name()
        .is_some_and(|name| repository::is_card_file(&name.to_string_lossy()));
    if !is_card {
        return Err(CoreError::NotACard(path));
    }

    let card = codec::read_card(&path)?;
    let mut session = ReviewSession::new(scheduler, vec![card]);
    let rated = session.rate(rating)?;

    Ok(RateCardResponse {
        success: true,
        file_path: rated.path.clone(),
        rating: rating.to_value(),
        new_due_date: rated.scheduling.due,
        new_state: rated.scheduling.state,
        reps: rated.scheduling.reps,
        difficulty: rated.scheduling.difficulty,
        stability: rated.scheduling.stability,
    })
}

/// Statistics over every card in a deck, recursively.
pub fn get_deck_stats(config: &Config, deck: Option<&str>) -> Result<DeckStatsResponse> {
    let deck_path = existing_deck(config, deck)?;
    let scan = repository::enumerate(&deck_path);

    Ok(DeckStatsResponse {
        stats: stats::compute(&scan.cards),
        warnings: messages(&scan.warnings),
        deck_path,
    })
}

/// Every directory under the base deck that holds cards, with its statistics.
pub fn list_decks(config: &Config) -> Result<ListDecksResponse> {
    let base_path = existing_deck(config, None)?;
    let (decks, warnings) = repository::deck_tree(&base_path, Utc::now());

    Ok(ListDecksResponse {
        base_path,
        decks,
        warnings: messages(&warnings),
    })
}

fn existing_deck(config: &Config, deck: Option<&str>) -> Result<PathBuf> {
    let path = config.resolve_deck_path(deck.unwrap_or(ROOT_DECK))?;
    if !path.exists() {
        return Err(CoreError::NotFound(path));
    }
    Ok(path)
}

fn messages(warnings: &[ScanWarning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}
