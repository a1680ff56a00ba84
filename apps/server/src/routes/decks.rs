//! Deck endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use srs_core::tools::{self, DeckStatsResponse, DueCardsResponse, ListDecksResponse};

use crate::error::Result;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DeckQuery {
    /// Deck directory relative to the base deck; defaults to the base itself.
    pub deck_path: Option<String>,
}

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<ListDecksResponse>> {
    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || tools::list_decks(&config)).await??;
    Ok(Json(response))
}

/// GET /api/decks/due?deck_path=
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<DueCardsResponse>> {
    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || {
        tools::get_due_cards(&config, query.deck_path.as_deref())
    })
    .await??;
    Ok(Json(response))
}

/// GET /api/decks/stats?deck_path=
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<DeckStatsResponse>> {
    let config = state.config.clone();
    let response = tokio::task::spawn_blocking(move || {
        tools::get_deck_stats(&config, query.deck_path.as_deref())
    })
    .await??;
    Ok(Json(response))
}
